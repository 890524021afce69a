use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::{compute_affordability, AffordabilityInput, AffordabilityResult};
use crate::types::*;
use crate::CarLoanResult;

/// One slice of the total cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSlice {
    pub label: String,
    pub amount: Money,
    /// Share of `CostBreakdown::total`, 0..=100
    pub share_percent: Rate,
}

/// Where the money goes over the life of the loan.
///
/// Slices are always down payment, loan amount, total interest and total fuel,
/// in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub slices: Vec<CostSlice>,
    pub total: Money,
}

pub fn cost_breakdown(summary: &AffordabilityResult) -> CostBreakdown {
    let parts = [
        ("Down Payment", summary.down_payment_amount),
        ("Loan Amount", summary.loan_amount),
        ("Total Interest", summary.total_interest_paid),
        ("Fuel Cost (Total)", summary.total_fuel_cost),
    ];
    let total: Money = parts.iter().map(|(_, amount)| *amount).sum();

    let slices = parts
        .iter()
        .map(|(label, amount)| CostSlice {
            label: (*label).to_string(),
            amount: *amount,
            share_percent: if total.is_zero() {
                Decimal::ZERO
            } else {
                *amount / total * dec!(100)
            },
        })
        .collect();

    CostBreakdown { slices, total }
}

/// Run the affordability engine and return only its cost breakdown.
pub fn analyze_cost_breakdown(
    input: &AffordabilityInput,
) -> CarLoanResult<ComputationOutput<CostBreakdown>> {
    let start = Instant::now();
    let report = compute_affordability(&input.inputs, &input.policy)?;
    let breakdown = cost_breakdown(&report.summary);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lifetime Cost Breakdown",
        &serde_json::json!({
            "car_price": input.inputs.car_price.to_string(),
            "term_months": report.summary.term_months,
            "monthly_fuel_cost": input.inputs.monthly_fuel_cost.to_string(),
        }),
        Vec::new(),
        elapsed,
        breakdown,
    ))
}
