use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, ordered_columns, scalar_text};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(None, map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", scalar_text(value)),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(None, res_map),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", scalar_text(result)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars go into one Field/Value table. Row lists (the yearly projection)
/// get a table of their own, and nested sections are printed under their
/// name.
fn print_object(title: Option<&str>, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalar_rows = 0;
    let mut sections: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => {
                sections.push((key.as_str(), val));
            }
            Value::Object(_) => sections.push((key.as_str(), val)),
            _ => {
                builder.push_record([key.as_str(), &scalar_text(val)]);
                scalar_rows += 1;
            }
        }
    }

    if let Some(t) = title {
        println!("\n{}:", t);
    }
    if scalar_rows > 0 {
        println!("{}", Table::from(builder));
    }

    for (key, val) in sections {
        let name = match title {
            Some(t) => format!("{t}.{key}"),
            None => key.to_string(),
        };
        match val {
            Value::Array(arr) => {
                println!("\n{}:", name);
                print_array_table(arr);
            }
            Value::Object(inner) => print_object(Some(&name), inner),
            _ => {}
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers = ordered_columns(first);
        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(cell_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}

/// Nested values inside a row are shown as `key=value` pairs.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => {
            let mut rows = Vec::new();
            flatten("", value, &mut rows);
            rows.into_iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ")
        }
        _ => scalar_text(value),
    }
}
