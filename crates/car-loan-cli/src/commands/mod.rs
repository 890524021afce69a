pub mod affordability;
pub mod schedule;

use car_loan_core::TermRounding;
use clap::ValueEnum;

/// Term rounding as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    HalfUp,
    HalfEven,
    Up,
    Down,
}

impl From<RoundingArg> for TermRounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfUp => TermRounding::HalfUp,
            RoundingArg::HalfEven => TermRounding::HalfEven,
            RoundingArg::Up => TermRounding::Up,
            RoundingArg::Down => TermRounding::Down,
        }
    }
}
