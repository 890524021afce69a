use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::currency::{format_currency, format_percent, Grouping};

/// Fields rendered as rupee amounts
const MONEY_FIELDS: &[&str] = &[
    "amount",
    "closing_balance",
    "cumulative_interest",
    "down_payment_amount",
    "emi",
    "income_threshold",
    "interest_portion",
    "loan_amount",
    "opening_balance",
    "payment",
    "principal",
    "principal_portion",
    "total",
    "total_cost_of_ownership",
    "total_cost_with_fuel",
    "total_fuel_cost",
    "total_interest",
    "total_interest_paid",
    "total_monthly_cost",
    "total_paid",
];

/// Fields already expressed in percent
const PERCENT_FIELDS: &[&str] = &["income_share_percent", "share_percent"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value, grouping: Grouping) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map, grouping);
            } else {
                print_flat_object(map, grouping);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr, grouping);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, grouping: Grouping) {
    if let Value::Object(res_map) = result {
        // Scalars first, then each nested section as its own table
        print_flat_object(res_map, grouping);
        for (key, val) in res_map {
            match val {
                Value::Object(section) => {
                    println!("\n{}", heading(key));
                    print_flat_object(section, grouping);
                }
                Value::Array(rows) => {
                    println!("\n{}", heading(key));
                    print_array_table(rows, grouping);
                }
                _ => {}
            }
        }
        print_verdict(res_map, envelope, grouping);
    } else {
        print_flat_object(envelope, grouping);
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/Value table of the scalar entries of an object.
fn print_flat_object(map: &Map<String, Value>, grouping: Grouping) {
    let scalars: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .collect();
    if scalars.is_empty() {
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalars {
        builder.push_record([key.as_str(), &format_field(key, val, grouping)]);
    }
    let table = Table::from(builder);
    println!("{}", table);
}

fn print_array_table(arr: &[Value], grouping: Grouping) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v, grouping))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// One-line verdict under an affordability summary.
fn print_verdict(result: &Map<String, Value>, envelope: &Map<String, Value>, grouping: Grouping) {
    let Some(Value::Object(summary)) = result.get("summary") else {
        return;
    };
    let Some(affordable) = summary.get("is_affordable").and_then(Value::as_bool) else {
        return;
    };
    let monthly = summary
        .get("total_monthly_cost")
        .and_then(as_decimal)
        .map(|d| format_currency(d, grouping))
        .unwrap_or_default();

    println!();
    if affordable {
        let line = format!("This car appears to be within your budget! Monthly cost is {monthly}");
        println!("{}", line.green().bold());
    } else {
        let threshold = envelope
            .get("assumptions")
            .and_then(|a| a.get("income_threshold_fraction"))
            .and_then(as_decimal)
            .map(|f| format!("{}%", (f * Decimal::from(100)).normalize()))
            .unwrap_or_else(|| "the allowed share".into());
        let line = format!(
            "This car might stretch your budget. The total monthly cost of {monthly} exceeds {threshold} of your income."
        );
        println!("{}", line.yellow().bold());
    }
}

fn heading(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn format_field(key: &str, value: &Value, grouping: Grouping) -> String {
    if MONEY_FIELDS.contains(&key) {
        if let Some(d) = as_decimal(value) {
            return format_currency(d, grouping);
        }
    }
    if PERCENT_FIELDS.contains(&key) {
        if let Some(d) = as_decimal(value) {
            return format_percent(d);
        }
    }
    format_value(value)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_fields_get_currency() {
        let v = json!("16606.684181");
        assert_eq!(format_field("emi", &v, Grouping::Indian), "₹16,606.68");
        assert_eq!(format_field("month", &json!(7), Grouping::Indian), "7");
    }

    #[test]
    fn test_percent_fields() {
        let v = json!("24.5083552");
        assert_eq!(format_field("income_share_percent", &v, Grouping::Indian), "24.5%");
    }

    #[test]
    fn test_non_numeric_money_field_passes_through() {
        let v = json!("n/a");
        assert_eq!(format_field("emi", &v, Grouping::Indian), "n/a");
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading("schedule"), "SCHEDULE");
        assert_eq!(heading("cost_slices"), "COST SLICES");
    }
}
