//! Lenient deserializers for host-persisted settings
//!
//! The settings editor stores form values verbatim, so numeric fields may
//! arrive as numbers, numeric strings or empty strings depending on which
//! editor version wrote them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional identifier.
///
/// Accepts numbers and numeric strings. `null`, `""` and `0` all mean
/// "absent". Anything unparseable is treated as absent as well.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_u64).filter(|id| *id != 0))
}

/// Deserialize a boolean that may have been stored as a string or number.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        _ => false,
    })
}

/// Deserialize a string where `null` means empty.
pub fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional string where `null` and blank strings are absent.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|text| text.trim().to_string()).filter(|text| !text.is_empty()))
}

/// Interpret a JSON value as an unsigned integer.
pub fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0 && n.fract() == 0.0).map(|n| n as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "nullable_string")]
        text: String,
    }

    fn parse(json: &str) -> Sample {
        serde_json::from_str(json).expect("sample should deserialize")
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        assert_eq!(parse(r#"{"id": 42}"#).id, Some(42));
        assert_eq!(parse(r#"{"id": "42"}"#).id, Some(42));
        assert_eq!(parse(r#"{"id": " 7 "}"#).id, Some(7));
    }

    #[test]
    fn zero_empty_and_null_ids_are_absent() {
        assert_eq!(parse(r#"{"id": 0}"#).id, None);
        assert_eq!(parse(r#"{"id": "0"}"#).id, None);
        assert_eq!(parse(r#"{"id": ""}"#).id, None);
        assert_eq!(parse(r#"{"id": null}"#).id, None);
        assert_eq!(parse(r#"{}"#).id, None);
        assert_eq!(parse(r#"{"id": "abc"}"#).id, None);
    }

    #[test]
    fn booleans_accept_legacy_encodings() {
        assert!(parse(r#"{"flag": true}"#).flag);
        assert!(parse(r#"{"flag": "true"}"#).flag);
        assert!(parse(r#"{"flag": 1}"#).flag);
        assert!(!parse(r#"{"flag": "0"}"#).flag);
        assert!(!parse(r#"{"flag": null}"#).flag);
    }

    #[derive(Deserialize)]
    struct Token {
        #[serde(default, deserialize_with = "optional_string")]
        token: Option<String>,
    }

    #[test]
    fn blank_optional_strings_are_absent() {
        let blank: Token = serde_json::from_str(r#"{"token": "  "}"#).unwrap();
        assert_eq!(blank.token, None);
        let set: Token = serde_json::from_str(r#"{"token": " abc "}"#).unwrap();
        assert_eq!(set.token.as_deref(), Some("abc"));
    }

    #[test]
    fn null_strings_become_empty() {
        assert_eq!(parse(r#"{"text": null}"#).text, "");
        assert_eq!(parse(r#"{"text": "Coding"}"#).text, "Coding");
    }
}
