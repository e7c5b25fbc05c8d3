use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline figures, most important first. The first one present and
/// non-null anywhere in the result is printed.
const PRIORITY_KEYS: [&str; 5] = [
    "irr",
    "ebit",
    "payback_period_years",
    "operating_cash_flow",
    "revenue",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result = result_of(value);

    for key in PRIORITY_KEYS {
        if let Some(val) = find_key(result, key) {
            return scalar_text(val);
        }
    }

    match result {
        Value::Object(map) => match map.iter().next() {
            Some((key, val)) => format!("{}: {}", key, scalar_text(val)),
            None => String::new(),
        },
        _ => scalar_text(result),
    }
}

/// Depth-first search through nested objects for a non-null `key`.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(v) = map.get(key) {
        if !v.is_null() {
            return Some(v);
        }
    }
    map.values()
        .filter(|v| v.is_object())
        .find_map(|v| find_key(v, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_irr_found_in_nested_section() {
        let v = json!({"result": {
            "pnl": {"ebit": "1.5", "revenue": "8.4"},
            "returns": {"irr": "0.1673"}
        }});
        assert_eq!(minimal_text(&v), "0.1673");
    }

    #[test]
    fn test_null_irr_falls_through() {
        let v = json!({"result": {"irr": null, "payback_period_years": "10"}});
        assert_eq!(minimal_text(&v), "10");
    }

    #[test]
    fn test_pnl_reports_ebit() {
        let v = json!({"result": {"revenue": "8.4", "ebit": "1.501408"}});
        assert_eq!(minimal_text(&v), "1.501408");
    }
}
