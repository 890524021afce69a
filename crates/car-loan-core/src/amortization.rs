use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CarLoanError;
use crate::loan::{self, AffordabilityPolicy, TermRounding, DEFAULT_MAX_TERM_MONTHS};
use crate::time_value;
use crate::types::*;
use crate::CarLoanResult;

/// One month of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub closing_balance: Money,
    pub cumulative_interest: Money,
}

/// Input for a standalone schedule (no affordability verdict)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub annual_interest_rate_percent: Rate,
    pub term_years: Years,
    #[serde(default)]
    pub term_rounding: TermRounding,
}

/// Output of a standalone schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub emi: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub rows: Vec<AmortizationRow>,
}

/// Month-by-month split of a level payment into interest and principal.
///
/// Every month but the last pays `emi`. The last month repays exactly the
/// remaining balance plus its interest, so the final closing balance is zero
/// and principal portions sum to `principal`.
pub fn amortize(
    principal: Money,
    monthly_rate: Rate,
    periods: u32,
    emi: Money,
) -> CarLoanResult<Vec<AmortizationRow>> {
    if periods == 0 {
        return Err(CarLoanError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    let mut cumulative_interest = Decimal::ZERO;

    for month in 1..=periods {
        let opening = balance;
        let interest = opening
            .checked_mul(monthly_rate)
            .ok_or_else(|| CarLoanError::out_of_range("principal"))?;
        cumulative_interest = cumulative_interest
            .checked_add(interest)
            .ok_or_else(|| CarLoanError::out_of_range("principal"))?;

        let (payment, principal_portion) = if month == periods {
            (opening + interest, opening)
        } else {
            (emi, emi - interest)
        };
        balance = if month == periods {
            Decimal::ZERO
        } else {
            opening - principal_portion
        };

        trace!(
            "month {month}: opening {opening}, interest {interest}, principal {principal_portion}"
        );

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            payment,
            interest_portion: interest,
            principal_portion,
            closing_balance: balance,
            cumulative_interest,
        });
    }

    Ok(rows)
}

/// Sum of the interest column.
pub fn total_interest(rows: &[AmortizationRow]) -> Money {
    rows.last()
        .map(|r| r.cumulative_interest)
        .unwrap_or(Decimal::ZERO)
}

/// Build a level-payment schedule for a plain principal, rate and term.
pub fn build_schedule(
    input: &ScheduleInput,
) -> CarLoanResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal < Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "principal",
            "Principal cannot be negative",
        ));
    }
    if input.annual_interest_rate_percent < Decimal::ZERO {
        return Err(CarLoanError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }

    let policy = AffordabilityPolicy {
        term_rounding: input.term_rounding,
        max_term_months: DEFAULT_MAX_TERM_MONTHS,
        ..AffordabilityPolicy::default()
    };
    let term_months = loan::term_months(input.term_years, &policy)?;
    if Decimal::from(term_months) != input.term_years * Decimal::from(12) {
        warnings.push(format!(
            "Term of {} years rounded to {term_months} months",
            input.term_years
        ));
    }

    let monthly_rate = time_value::monthly_rate(input.annual_interest_rate_percent);
    let emi = time_value::emi(input.principal, monthly_rate, term_months).map_err(|e| {
        rename_field(e, &[("rate", "annual_interest_rate_percent")])
    })?;
    debug!("schedule: principal {}, {term_months} months, emi {emi}", input.principal);

    let rows = amortize(input.principal, monthly_rate, term_months, emi)?;
    let total_interest = total_interest(&rows);
    let total_paid = rows
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.payment))
        .ok_or_else(|| CarLoanError::out_of_range("principal"))?;

    let output = AmortizationSchedule {
        principal: input.principal,
        monthly_rate,
        term_months,
        emi,
        total_interest,
        total_paid,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization Schedule",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_interest_rate_percent.to_string(),
            "term_months": term_months,
            "term_rounding": input.term_rounding,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Re-attribute an error raised by a generic helper to the caller's field name.
pub(crate) fn rename_field(err: CarLoanError, renames: &[(&str, &str)]) -> CarLoanError {
    match err {
        CarLoanError::InvalidInput { field, reason } => {
            let field = renames
                .iter()
                .find(|(from, _)| *from == field)
                .map(|(_, to)| to.to_string())
                .unwrap_or(field);
            CarLoanError::InvalidInput { field, reason }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn five_year_input() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(800_000),
            annual_interest_rate_percent: dec!(9),
            term_years: dec!(5),
            term_rounding: TermRounding::HalfUp,
        }
    }

    #[test]
    fn test_schedule_shape() {
        let out = build_schedule(&five_year_input()).unwrap();
        let sched = &out.result;
        assert_eq!(sched.term_months, 60);
        assert_eq!(sched.rows.len(), 60);
        assert_eq!(sched.rows[0].month, 1);
        assert_eq!(sched.rows[0].opening_balance, dec!(800_000));
        assert_eq!(sched.rows[59].closing_balance, Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_first_month_interest() {
        let out = build_schedule(&five_year_input()).unwrap();
        // 800,000 * 0.0075
        assert_eq!(out.result.rows[0].interest_portion, dec!(6000));
    }

    #[test]
    fn test_interest_declines_and_principal_grows() {
        let out = build_schedule(&five_year_input()).unwrap();
        let rows = &out.result.rows;
        for pair in rows.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
            assert!(pair[1].principal_portion > pair[0].principal_portion);
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
    }

    #[test]
    fn test_principal_sums_to_loan() {
        let out = build_schedule(&five_year_input()).unwrap();
        let principal: Money = out.result.rows.iter().map(|r| r.principal_portion).sum();
        assert!((principal - dec!(800_000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_totals_consistent() {
        let out = build_schedule(&five_year_input()).unwrap();
        let sched = &out.result;
        assert!((sched.total_paid - (sched.principal + sched.total_interest)).abs() < dec!(0.01));
        assert_eq!(
            sched.rows.last().unwrap().cumulative_interest,
            sched.total_interest
        );
    }

    #[test]
    fn test_final_payment_close_to_emi() {
        let out = build_schedule(&five_year_input()).unwrap();
        let last = out.result.rows.last().unwrap();
        assert!((last.payment - out.result.emi).abs() < dec!(0.01));
    }

    #[test]
    fn test_fractional_term_warns() {
        let mut input = five_year_input();
        input.term_years = dec!(2.5);
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.term_months, 30);
        assert!(out.warnings.is_empty());

        input.term_years = dec!(2.55);
        let out = build_schedule(&input).unwrap();
        assert_eq!(out.result.term_months, 31);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_principal_schedule() {
        let mut input = five_year_input();
        input.principal = Decimal::ZERO;
        let out = build_schedule(&input).unwrap();
        assert!(out.result.emi.is_zero());
        for row in &out.result.rows {
            assert!(row.interest_portion.is_zero());
            assert!(row.principal_portion.is_zero());
            assert!(row.closing_balance.is_zero());
        }
    }

    #[test]
    fn test_negative_principal_rejected() {
        let mut input = five_year_input();
        input.principal = dec!(-1);
        let err = build_schedule(&input).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_amortize_zero_periods() {
        assert!(amortize(dec!(100), dec!(0.01), 0, dec!(100)).is_err());
    }

    #[test]
    fn test_rename_field() {
        let err = CarLoanError::invalid("rate", "exceeds representable range");
        let renamed = rename_field(err, &[("rate", "annual_interest_rate_percent")]);
        assert_eq!(renamed.field(), Some("annual_interest_rate_percent"));
    }
}
