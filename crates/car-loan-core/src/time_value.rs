use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CarLoanError;
use crate::types::{Money, Rate};
use crate::CarLoanResult;

/// Monthly periodic rate from an annual rate quoted in percent (9 -> 0.0075)
pub fn monthly_rate(annual_percent: Rate) -> Rate {
    annual_percent / dec!(100) / dec!(12)
}

/// `(1 + rate)^periods` by repeated multiplication.
///
/// Returns `None` when the factor leaves the representable range.
pub fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(rate)?;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.checked_mul(base)?;
    }
    Some(factor)
}

/// Equated monthly installment for a fully amortizing loan.
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n when r is zero.
pub fn emi(principal: Money, rate: Rate, periods: u32) -> CarLoanResult<Money> {
    if periods == 0 {
        return Err(CarLoanError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }
    if rate < Decimal::ZERO {
        return Err(CarLoanError::invalid("rate", "Rate cannot be negative"));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor =
        compound_factor(rate, periods).ok_or_else(|| CarLoanError::out_of_range("rate"))?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // rate so small the factor rounds to 1: fall back to straight-line
        return Ok(principal / Decimal::from(periods));
    }

    // r * f / (f - 1) first keeps the intermediate close to r
    let payment_per_unit = rate
        .checked_mul(factor)
        .ok_or_else(|| CarLoanError::out_of_range("rate"))?
        / denominator;

    principal
        .checked_mul(payment_per_unit)
        .ok_or_else(|| CarLoanError::out_of_range("principal"))
}
