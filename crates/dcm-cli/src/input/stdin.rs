use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Attempt to read assumptions from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

/// JSON first; anything else is tried as YAML.
fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') {
        return Ok(Some(serde_json::from_str(trimmed)?));
    }
    Ok(Some(serde_yaml::from_str(trimmed)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_empty_input_is_none() {
        assert!(parse_piped::<Value>("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json: Value = parse_piped(r#"{"capacity_gw": "2.5", "horizon_years": 12}"#)
            .unwrap()
            .unwrap();
        let yaml: Value = parse_piped("capacity_gw: \"2.5\"\nhorizon_years: 12\n")
            .unwrap()
            .unwrap();
        assert_eq!(json, yaml);
    }
}
