use serde_json::{Map, Value};
use std::io::{self, Write};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Write the tabular part of a result as CSV.
///
/// An envelope whose result holds a nested object (the affordability summary)
/// is written as field/value pairs of that object; otherwise the first array
/// of rows (schedule rows, cost slices) becomes the table. Flat results fall
/// back to field/value pairs.
pub fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some(Value::Object(section)) = body.values().find(|v| v.is_object()) {
                write_fields(&mut wtr, section)?;
            } else if let Some(Value::Array(rows)) = body.values().find(|v| v.is_array()) {
                write_array_csv(&mut wtr, rows)?;
            } else {
                write_fields(&mut wtr, body)?;
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr)?;
        }
        _ => {
            wtr.write_record([&format_csv_value(value)])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        if val.is_array() || val.is_object() {
            continue;
        }
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    if arr.is_empty() {
        return Ok(());
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_written_as_fields() {
        let v = json!({
            "result": {
                "summary": { "emi": "100", "is_affordable": true },
                "schedule": [{ "month": 1 }]
            },
            "warnings": []
        });
        assert_eq!(render(&v), "field,value\nemi,100\nis_affordable,true\n");
    }

    #[test]
    fn test_rows_written_as_table() {
        let v = json!({
            "result": {
                "emi": "50",
                "rows": [
                    { "month": 1, "payment": "50" },
                    { "month": 2, "payment": "50" }
                ]
            }
        });
        assert_eq!(render(&v), "month,payment\n1,50\n2,50\n");
    }

    #[test]
    fn test_flat_result_fields() {
        let v = json!({ "result": { "a": "1", "b": null } });
        assert_eq!(render(&v), "field,value\na,1\nb,\n");
    }
}
