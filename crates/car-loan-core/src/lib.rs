pub mod affordability;
pub mod amortization;
pub mod breakdown;
pub mod error;
pub mod loan;
pub mod time_value;
pub mod types;

pub use affordability::{
    analyze_affordability, compute_affordability, AffordabilityInput, AffordabilityReport,
    AffordabilityResult,
};
pub use amortization::{AmortizationRow, AmortizationSchedule, ScheduleInput};
pub use breakdown::{CostBreakdown, CostSlice};
pub use error::CarLoanError;
pub use loan::{AffordabilityPolicy, LoanInputs, TermRounding};
pub use types::*;

/// Standard result type for all car-loan operations
pub type CarLoanResult<T> = Result<T, CarLoanError>;
