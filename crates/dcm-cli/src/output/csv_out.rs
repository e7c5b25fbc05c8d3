use serde_json::{Map, Value};
use std::io;

use super::{flatten, ordered_columns, result_of, scalar_text};

/// Write output as CSV to stdout.
///
/// A result holding a table (the yearly cash-flow rows, the input ranges) is
/// written as that table; anything else becomes `metric,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = result_of(value);
    match result {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) => match first_table(map) {
            Some(rows) => write_array_csv(&mut wtr, rows),
            None => write_field_value_csv(&mut wtr, result),
        },
        _ => {
            let _ = wtr.write_record([&scalar_text(result)]);
        }
    }

    let _ = wtr.flush();
}

/// First top-level field that is a non-empty array of objects.
fn first_table(map: &Map<String, Value>) -> Option<&[Value]> {
    map.values().find_map(|v| match v {
        Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => Some(arr.as_slice()),
        _ => None,
    })
}

fn write_field_value_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let mut rows = Vec::new();
    flatten("", value, &mut rows);
    let _ = wtr.write_record(["metric", "value"]);
    for (field, val) in rows {
        let _ = wtr.write_record([field, val]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers = ordered_columns(first);
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
    }
}
