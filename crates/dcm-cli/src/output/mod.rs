pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The payload inside a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects and arrays into dotted `field, value` rows
/// (`cash_flow.years.0.cash_flow`).
pub(crate) fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{prefix}.{k}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&key(k), v, rows);
            }
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                flatten(&key(&i.to_string()), v, rows);
            }
        }
        _ => rows.push((prefix.to_string(), scalar_text(value))),
    }
}

/// Row-table columns in presentation order. Other keys keep map order after
/// these.
const COLUMN_ORDER: [&str; 9] = [
    "year",
    "metric",
    "field",
    "label",
    "cash_flow",
    "cumulative_cash_flow",
    "value",
    "min",
    "max",
];

pub(crate) fn ordered_columns(row: &Map<String, Value>) -> Vec<&str> {
    let mut columns: Vec<&str> = row.keys().map(String::as_str).collect();
    columns.sort_by_key(|k| {
        COLUMN_ORDER
            .iter()
            .position(|c| c == k)
            .unwrap_or(COLUMN_ORDER.len())
    });
    columns
}

pub(crate) fn scalar_text(value: &Value) -> String {
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

    #[test]
    fn test_flatten_nested() {
        let v = json!({"pnl": {"ebit": "1.5"}, "years": [{"year": 1}], "irr": null});
        let mut rows = Vec::new();
        flatten("", &v, &mut rows);
        assert_eq!(
            rows,
            vec![
                ("irr".to_string(), String::new()),
                ("pnl.ebit".to_string(), "1.5".to_string()),
                ("years.0.year".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_columns_follow_presentation_order() {
        let row = json!({"cumulative_cash_flow": "1", "year": 1, "cash_flow": "2", "note": "x"});
        let map = row.as_object().unwrap();
        assert_eq!(
            ordered_columns(map),
            vec!["year", "cash_flow", "cumulative_cash_flow", "note"]
        );
    }

    #[test]
    fn test_result_of_unwraps_envelope() {
        let v = json!({"result": {"ebit": "1"}, "warnings": []});
        assert_eq!(result_of(&v), &json!({"ebit": "1"}));
        let bare = json!([1, 2]);
        assert_eq!(result_of(&bare), &bare);
    }
}
