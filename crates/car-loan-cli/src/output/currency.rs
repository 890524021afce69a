use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};

const SYMBOL: &str = "₹";

/// Digit grouping for rendered amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Grouping {
    /// 12,34,567.89
    #[default]
    Indian,
    /// 1,234,567.89
    International,
}

/// Render an amount as rupees, rounded to paise, dropping a `.00` tail.
pub fn format_currency(amount: Decimal, grouping: Grouping) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(SYMBOL);
    out.push_str(&group_digits(whole, grouping));
    if frac != "00" {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Render a percentage with one decimal place.
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{:.1}%",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let step = match grouping {
        Grouping::Indian => 2,
        Grouping::International => 3,
    };

    // group the head from the right in `step`-sized chunks
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let begin = end.saturating_sub(step);
        groups.push(&head[begin..end]);
        end = begin;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}
