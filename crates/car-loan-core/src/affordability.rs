use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{self, rename_field, AmortizationRow};
use crate::error::CarLoanError;
use crate::loan::{self, AffordabilityPolicy, LoanInputs};
use crate::time_value;
use crate::types::*;
use crate::CarLoanResult;

/// Input envelope for an affordability check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub inputs: LoanInputs,
    #[serde(default)]
    pub policy: AffordabilityPolicy,
}

/// Summary metrics and verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub term_months: u32,
    pub monthly_rate: Rate,
    pub emi: Money,
    pub total_monthly_cost: Money,
    pub income_threshold: Money,
    /// Total monthly cost as a percentage of monthly income
    pub income_share_percent: Rate,
    pub is_affordable: bool,
    pub total_interest_paid: Money,
    /// Car price plus all interest paid
    pub total_cost_of_ownership: Money,
    /// Fuel over the whole loan term
    pub total_fuel_cost: Money,
    pub total_cost_with_fuel: Money,
}

/// Verdict together with the full month-by-month schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub summary: AffordabilityResult,
    pub schedule: Vec<AmortizationRow>,
}

/// Decide whether a car loan fits the income policy and lay out its schedule.
///
/// Pure: validation runs to completion first, then the computation. Identical
/// inputs always produce identical reports.
pub fn compute_affordability(
    inputs: &LoanInputs,
    policy: &AffordabilityPolicy,
) -> CarLoanResult<AffordabilityReport> {
    loan::validate(inputs, policy)?;

    let terms = loan::loan_terms(inputs)?;
    let term_months = loan::term_months(inputs.loan_term_years, policy)?;
    let monthly_rate = time_value::monthly_rate(inputs.annual_interest_rate_percent);

    let emi = time_value::emi(terms.loan_amount, monthly_rate, term_months).map_err(|e| {
        rename_field(
            e,
            &[
                ("rate", "annual_interest_rate_percent"),
                ("principal", "car_price"),
            ],
        )
    })?;
    debug!(
        "loan {} over {term_months} months at {monthly_rate}/month: emi {emi}",
        terms.loan_amount
    );

    let schedule = amortization::amortize(terms.loan_amount, monthly_rate, term_months, emi)
        .map_err(|e| rename_field(e, &[("principal", "car_price")]))?;
    let total_interest_paid = amortization::total_interest(&schedule);

    let total_monthly_cost = emi
        .checked_add(inputs.monthly_fuel_cost)
        .ok_or_else(|| CarLoanError::out_of_range("monthly_fuel_cost"))?;
    let income_threshold = inputs.monthly_income * policy.income_threshold_fraction;
    let is_affordable = total_monthly_cost <= income_threshold;
    let income_share_percent = total_monthly_cost
        .checked_mul(dec!(100))
        .ok_or_else(|| CarLoanError::out_of_range("car_price"))?
        / inputs.monthly_income;

    let total_cost_of_ownership = inputs
        .car_price
        .checked_add(total_interest_paid)
        .ok_or_else(|| CarLoanError::out_of_range("car_price"))?;
    let total_fuel_cost = inputs
        .monthly_fuel_cost
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| CarLoanError::out_of_range("monthly_fuel_cost"))?;
    let total_cost_with_fuel = total_cost_of_ownership
        .checked_add(total_fuel_cost)
        .ok_or_else(|| CarLoanError::out_of_range("monthly_fuel_cost"))?;

    debug!("monthly cost {total_monthly_cost} vs threshold {income_threshold}: affordable={is_affordable}");

    Ok(AffordabilityReport {
        summary: AffordabilityResult {
            down_payment_amount: terms.down_payment_amount,
            loan_amount: terms.loan_amount,
            term_months,
            monthly_rate,
            emi,
            total_monthly_cost,
            income_threshold,
            income_share_percent,
            is_affordable,
            total_interest_paid,
            total_cost_of_ownership,
            total_fuel_cost,
            total_cost_with_fuel,
        },
        schedule,
    })
}

/// Run an affordability check and wrap it with methodology, assumptions and
/// advisory warnings.
pub fn analyze_affordability(
    input: &AffordabilityInput,
) -> CarLoanResult<ComputationOutput<AffordabilityReport>> {
    let start = Instant::now();
    let report = compute_affordability(&input.inputs, &input.policy)?;
    let warnings = advisories(input, &report.summary);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Car Loan Affordability (level-payment annuity, income threshold test)",
        &serde_json::json!({
            "car_price": input.inputs.car_price.to_string(),
            "down_payment_percent": input.inputs.down_payment_percent.to_string(),
            "annual_rate_percent": input.inputs.annual_interest_rate_percent.to_string(),
            "term_months": report.summary.term_months,
            "income_threshold_fraction": input.policy.income_threshold_fraction.to_string(),
            "term_rounding": input.policy.term_rounding,
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn advisories(input: &AffordabilityInput, summary: &AffordabilityResult) -> Vec<String> {
    let mut warnings = Vec::new();
    let inputs = &input.inputs;

    if summary.loan_amount.is_zero() {
        warnings.push("Down payment covers the full price; no financing required".into());
    }
    if inputs.monthly_fuel_cost > summary.income_threshold {
        warnings.push(format!(
            "Fuel cost alone ({}) exceeds the income threshold ({})",
            inputs.monthly_fuel_cost.round_dp(2),
            summary.income_threshold.round_dp(2)
        ));
    }
    if Decimal::from(summary.term_months) != inputs.loan_term_years * dec!(12) {
        warnings.push(format!(
            "Loan term of {} years rounded to {} months",
            inputs.loan_term_years, summary.term_months
        ));
    }
    if inputs.annual_interest_rate_percent.is_zero() && !summary.loan_amount.is_zero() {
        warnings.push("Interest-free loan: EMI is the loan amount divided evenly".into());
    }
    warnings
}
