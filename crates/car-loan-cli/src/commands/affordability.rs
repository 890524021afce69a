use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use car_loan_core::affordability::{self, AffordabilityInput};
use car_loan_core::breakdown;
use car_loan_core::loan::{AffordabilityPolicy, LoanInputs};

use super::RoundingArg;
use crate::input;

/// Arguments shared by the affordability and breakdown commands
#[derive(Args)]
pub struct AffordArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total price of the car
    #[arg(long)]
    pub car_price: Option<Decimal>,

    /// Down payment as a percent of the price (0-100)
    #[arg(long, default_value = "20")]
    pub down_payment: Decimal,

    /// Monthly take-home income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Loan term in years (fractions allowed, e.g. 2.5)
    #[arg(long, default_value = "4")]
    pub term_years: Decimal,

    /// Annual interest rate in percent (e.g. 9 for 9%)
    #[arg(long, default_value = "8")]
    pub rate: Decimal,

    /// Expected monthly fuel cost
    #[arg(long, default_value = "0")]
    pub fuel: Decimal,

    /// Share of income the monthly cost may take (e.g. 0.10)
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// How fractional terms are rounded to whole months
    #[arg(long, value_enum)]
    pub term_rounding: Option<RoundingArg>,
}

impl AffordArgs {
    /// Resolve the input from a file, piped stdin, or the individual flags.
    /// Policy flags given on the command line override the input's policy.
    fn resolve(&self) -> Result<AffordabilityInput, Box<dyn std::error::Error>> {
        let mut afford_input: AffordabilityInput = if let Some(ref path) = self.input {
            input::file::read_input(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            let car_price = self
                .car_price
                .ok_or("--car-price is required (or provide --input)")?;
            let income = self
                .income
                .ok_or("--income is required (or provide --input)")?;

            AffordabilityInput {
                inputs: LoanInputs {
                    car_price,
                    down_payment_percent: self.down_payment,
                    monthly_income: income,
                    loan_term_years: self.term_years,
                    annual_interest_rate_percent: self.rate,
                    monthly_fuel_cost: self.fuel,
                },
                policy: AffordabilityPolicy::default(),
            }
        };

        if let Some(threshold) = self.threshold {
            afford_input.policy.income_threshold_fraction = threshold;
        }
        if let Some(rounding) = self.term_rounding {
            afford_input.policy.term_rounding = rounding.into();
        }
        Ok(afford_input)
    }
}

pub fn run_afford(args: AffordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input = args.resolve()?;
    let result = affordability::analyze_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_breakdown(args: AffordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input = args.resolve()?;
    let result = breakdown::analyze_cost_breakdown(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
