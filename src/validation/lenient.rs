use std::fmt::Display;
use std::str::FromStr;

use serde::{de::Error as _, Deserialize, Deserializer};

/// Accept a scalar either in its JSON form or as text
///
/// Multipart forms deliver every field as text, so `"85"` and `"true"` must
/// deserialize the same as `85` and `true`. Use with
/// `#[serde(default, deserialize_with = "lenient")]` on an `Option<T>`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid value `{text}`: {e}"))),
    }
}

/// Accept a list of strings, or a single string as a one-item list
///
/// A multipart form that sends one `technologies` field delivers a plain
/// string rather than an array.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Many(items)) => Some(items),
        Some(Raw::One(item)) => Some(vec![item]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "lenient")]
        count: Option<i32>,
        #[serde(default, deserialize_with = "lenient")]
        flag: Option<bool>,
    }

    #[test]
    fn accepts_native_and_text_scalars() {
        let native: Form = serde_json::from_value(json!({ "count": 85, "flag": true })).unwrap();
        let text: Form = serde_json::from_value(json!({ "count": "85", "flag": "true" })).unwrap();

        assert_eq!(native.count, Some(85));
        assert_eq!(text.count, Some(85));
        assert_eq!(text.flag, Some(true));
    }

    #[derive(Debug, Deserialize)]
    struct Tags {
        #[serde(default, deserialize_with = "one_or_many")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn single_string_becomes_list() {
        let one: Tags = serde_json::from_value(json!({ "tags": "Rust" })).unwrap();
        let many: Tags = serde_json::from_value(json!({ "tags": ["Rust", "Axum"] })).unwrap();
        let none: Tags = serde_json::from_value(json!({})).unwrap();

        assert_eq!(one.tags, Some(vec!["Rust".to_string()]));
        assert_eq!(many.tags.map(|t| t.len()), Some(2));
        assert!(none.tags.is_none());
    }

    #[test]
    fn missing_is_none_and_bad_text_fails() {
        let empty: Form = serde_json::from_value(json!({})).unwrap();
        assert!(empty.count.is_none());

        assert!(serde_json::from_value::<Form>(json!({ "count": "lots" })).is_err());
    }
}
