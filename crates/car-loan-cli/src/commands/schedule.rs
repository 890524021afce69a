use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use car_loan_core::amortization::{self, ScheduleInput};

use super::RoundingArg;
use crate::input;

/// Arguments for a plain amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years (fractions allowed)
    #[arg(long)]
    pub term_years: Option<Decimal>,

    /// How fractional terms are rounded to whole months
    #[arg(long, value_enum)]
    pub term_rounding: Option<RoundingArg>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term_years = args
            .term_years
            .ok_or("--term-years is required (or provide --input)")?;

        ScheduleInput {
            principal,
            annual_interest_rate_percent: rate,
            term_years,
            term_rounding: Default::default(),
        }
    };

    if let Some(rounding) = args.term_rounding {
        schedule_input.term_rounding = rounding.into();
    }

    let result = amortization::build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
