use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CarLoanError;
use crate::types::*;
use crate::CarLoanResult;

/// Share of monthly income the total monthly cost may consume.
pub const DEFAULT_INCOME_THRESHOLD_FRACTION: Rate = dec!(0.10);

/// Longest term accepted after rounding (100 years).
pub const DEFAULT_MAX_TERM_MONTHS: u32 = 1200;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// The six scalar inputs of an affordability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub car_price: Money,
    /// 0..=100
    pub down_payment_percent: Rate,
    pub monthly_income: Money,
    /// May be fractional; rounded to whole months per [`TermRounding`]
    pub loan_term_years: Years,
    /// 9 means 9% a year
    pub annual_interest_rate_percent: Rate,
    pub monthly_fuel_cost: Money,
}

/// How `loan_term_years * 12` is turned into a whole number of months
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermRounding {
    /// Nearest month, halves away from zero (2.5 years = 30, 1/24 year = 1)
    #[default]
    HalfUp,
    /// Nearest month, halves to the even neighbour
    HalfEven,
    /// Any partial month counts as a full one
    Up,
    /// Partial months are dropped
    Down,
}

impl TermRounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            TermRounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            TermRounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            TermRounding::Up => RoundingStrategy::AwayFromZero,
            TermRounding::Down => RoundingStrategy::ToZero,
        }
    }
}

/// Policy constants of the affordability verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityPolicy {
    pub income_threshold_fraction: Rate,
    pub term_rounding: TermRounding,
    pub max_term_months: u32,
}

impl Default for AffordabilityPolicy {
    fn default() -> Self {
        Self {
            income_threshold_fraction: DEFAULT_INCOME_THRESHOLD_FRACTION,
            term_rounding: TermRounding::default(),
            max_term_months: DEFAULT_MAX_TERM_MONTHS,
        }
    }
}

/// Down payment and financed amount derived from the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub down_payment_amount: Money,
    pub loan_amount: Money,
}

/// Check every input and policy field before any computation runs.
///
/// Fields are checked in declaration order and the first violation is
/// returned.
pub fn validate(inputs: &LoanInputs, policy: &AffordabilityPolicy) -> CarLoanResult<()> {
    if inputs.car_price <= Decimal::ZERO {
        return Err(CarLoanError::invalid("car_price", "Car price must be positive"));
    }
    if inputs.down_payment_percent < Decimal::ZERO || inputs.down_payment_percent > HUNDRED {
        return Err(CarLoanError::invalid(
            "down_payment_percent",
            "Down payment percent out of [0, 100]",
        ));
    }
    if inputs.monthly_income <= Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "monthly_income",
            "Monthly income must be positive",
        ));
    }
    if inputs.loan_term_years <= Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "loan_term_years",
            "Loan term must be positive",
        ));
    }
    if inputs.annual_interest_rate_percent < Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if inputs.monthly_fuel_cost < Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "monthly_fuel_cost",
            "Fuel cost cannot be negative",
        ));
    }
    validate_policy(policy)?;
    term_months(inputs.loan_term_years, policy).map(|_| ())
}

pub fn validate_policy(policy: &AffordabilityPolicy) -> CarLoanResult<()> {
    if policy.income_threshold_fraction <= Decimal::ZERO
        || policy.income_threshold_fraction > Decimal::ONE
    {
        return Err(CarLoanError::invalid(
            "income_threshold_fraction",
            "Threshold fraction must be in (0, 1]",
        ));
    }
    if policy.max_term_months == 0 {
        return Err(CarLoanError::invalid(
            "max_term_months",
            "Maximum term must be at least 1 month",
        ));
    }
    Ok(())
}

/// Number of monthly installments for a term given in years.
pub fn term_months(years: Years, policy: &AffordabilityPolicy) -> CarLoanResult<u32> {
    if years <= Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "loan_term_years",
            "Loan term must be positive",
        ));
    }
    let months = years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| CarLoanError::out_of_range("loan_term_years"))?
        .round_dp_with_strategy(0, policy.term_rounding.strategy());

    if months.is_zero() {
        return Err(CarLoanError::invalid(
            "loan_term_years",
            format!("Loan term of {years} years rounds to zero months"),
        ));
    }
    if months > Decimal::from(policy.max_term_months) {
        return Err(CarLoanError::invalid(
            "loan_term_years",
            format!(
                "Loan term of {months} months exceeds the maximum of {}",
                policy.max_term_months
            ),
        ));
    }
    months
        .to_u32()
        .ok_or_else(|| CarLoanError::out_of_range("loan_term_years"))
}

/// Split the car price into down payment and financed amount.
pub fn loan_terms(inputs: &LoanInputs) -> CarLoanResult<LoanTerms> {
    let down_payment_amount = inputs
        .car_price
        .checked_mul(inputs.down_payment_percent)
        .ok_or_else(|| CarLoanError::out_of_range("car_price"))?
        / HUNDRED;
    // down payment never exceeds the price once validated, but clamp so a
    // rounding residue can't produce a negative loan
    let loan_amount = (inputs.car_price - down_payment_amount).max(Decimal::ZERO);

    Ok(LoanTerms {
        down_payment_amount,
        loan_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LoanInputs {
        LoanInputs {
            car_price: dec!(1_000_000),
            down_payment_percent: dec!(20),
            monthly_income: dec!(80_000),
            loan_term_years: dec!(5),
            annual_interest_rate_percent: dec!(9),
            monthly_fuel_cost: dec!(3_000),
        }
    }

    fn field_of(err: CarLoanError) -> String {
        err.field().unwrap_or_default().to_string()
    }

    #[test]
    fn test_valid_inputs_pass() {
        assert!(validate(&sample(), &AffordabilityPolicy::default()).is_ok());
    }

    fn rejected_field(mutate: impl FnOnce(&mut LoanInputs)) -> String {
        let mut inputs = sample();
        mutate(&mut inputs);
        field_of(validate(&inputs, &AffordabilityPolicy::default()).unwrap_err())
    }

    #[test]
    fn test_each_field_is_reported() {
        assert_eq!(rejected_field(|i| i.car_price = Decimal::ZERO), "car_price");
        assert_eq!(
            rejected_field(|i| i.down_payment_percent = dec!(-1)),
            "down_payment_percent"
        );
        assert_eq!(
            rejected_field(|i| i.down_payment_percent = dec!(100.01)),
            "down_payment_percent"
        );
        assert_eq!(rejected_field(|i| i.monthly_income = dec!(-5)), "monthly_income");
        assert_eq!(
            rejected_field(|i| i.loan_term_years = Decimal::ZERO),
            "loan_term_years"
        );
        assert_eq!(
            rejected_field(|i| i.annual_interest_rate_percent = dec!(-0.5)),
            "annual_interest_rate_percent"
        );
        assert_eq!(
            rejected_field(|i| i.monthly_fuel_cost = dec!(-1)),
            "monthly_fuel_cost"
        );
    }

    #[test]
    fn test_down_payment_bounds_inclusive() {
        let policy = AffordabilityPolicy::default();
        let mut inputs = sample();
        inputs.down_payment_percent = Decimal::ZERO;
        assert!(validate(&inputs, &policy).is_ok());
        inputs.down_payment_percent = dec!(100);
        assert!(validate(&inputs, &policy).is_ok());
    }

    #[test]
    fn test_error_message_names_field() {
        let mut inputs = sample();
        inputs.down_payment_percent = dec!(150);
        let err = validate(&inputs, &AffordabilityPolicy::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: down_payment_percent — Down payment percent out of [0, 100]"
        );
    }

    #[test]
    fn test_policy_threshold_bounds() {
        let mut policy = AffordabilityPolicy::default();
        policy.income_threshold_fraction = Decimal::ZERO;
        assert_eq!(
            field_of(validate_policy(&policy).unwrap_err()),
            "income_threshold_fraction"
        );
        policy.income_threshold_fraction = dec!(1.01);
        assert!(validate_policy(&policy).is_err());
        policy.income_threshold_fraction = Decimal::ONE;
        assert!(validate_policy(&policy).is_ok());
    }

    #[test]
    fn test_term_months_whole_years() {
        let policy = AffordabilityPolicy::default();
        assert_eq!(term_months(dec!(5), &policy).unwrap(), 60);
        assert_eq!(term_months(dec!(1), &policy).unwrap(), 12);
    }

    #[test]
    fn test_term_months_fractional_half_up() {
        let policy = AffordabilityPolicy::default();
        assert_eq!(term_months(dec!(2.5), &policy).unwrap(), 30);
        // 2.625 years = 31.5 months
        assert_eq!(term_months(dec!(2.625), &policy).unwrap(), 32);
        // 2.5416 years = 30.4992 months
        assert_eq!(term_months(dec!(2.5416), &policy).unwrap(), 30);
    }

    #[test]
    fn test_term_months_rounding_modes() {
        // 2.625 years = 31.5 months, 2.5416 years = 30.4992 months
        let mut policy = AffordabilityPolicy::default();

        policy.term_rounding = TermRounding::HalfEven;
        assert_eq!(term_months(dec!(2.625), &policy).unwrap(), 32);
        assert_eq!(term_months(dec!(2.875), &policy).unwrap(), 34); // 34.5

        policy.term_rounding = TermRounding::Up;
        assert_eq!(term_months(dec!(2.5416), &policy).unwrap(), 31);

        policy.term_rounding = TermRounding::Down;
        assert_eq!(term_months(dec!(2.625), &policy).unwrap(), 31);
    }

    #[test]
    fn test_term_rounding_to_zero_rejected() {
        let mut policy = AffordabilityPolicy::default();
        // 0.04 years = 0.48 months
        assert!(term_months(dec!(0.04), &policy).is_err());
        policy.term_rounding = TermRounding::Up;
        assert_eq!(term_months(dec!(0.04), &policy).unwrap(), 1);
    }

    #[test]
    fn test_term_above_maximum_rejected() {
        let policy = AffordabilityPolicy {
            max_term_months: 84,
            ..AffordabilityPolicy::default()
        };
        assert_eq!(term_months(dec!(7), &policy).unwrap(), 84);
        let err = term_months(dec!(7.5), &policy).unwrap_err();
        assert_eq!(field_of(err), "loan_term_years");
    }

    #[test]
    fn test_loan_terms_split() {
        let terms = loan_terms(&sample()).unwrap();
        assert_eq!(terms.down_payment_amount, dec!(200_000));
        assert_eq!(terms.loan_amount, dec!(800_000));
    }

    #[test]
    fn test_full_down_payment_leaves_no_loan() {
        let mut inputs = sample();
        inputs.down_payment_percent = dec!(100);
        let terms = loan_terms(&inputs).unwrap();
        assert_eq!(terms.down_payment_amount, dec!(1_000_000));
        assert!(terms.loan_amount.is_zero());
    }

    #[test]
    fn test_policy_defaults_from_empty_json() {
        let policy: AffordabilityPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, AffordabilityPolicy::default());

        let policy: AffordabilityPolicy =
            serde_json::from_str(r#"{"term_rounding": "half_even"}"#).unwrap();
        assert_eq!(policy.term_rounding, TermRounding::HalfEven);
        assert_eq!(policy.income_threshold_fraction, dec!(0.10));
    }
}
