//! `deserialize_with` helpers for library files written by hand or by other
//! tools. A bad field falls back to its default and a bad list item is
//! dropped, so one malformed value never loses the whole entry.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::frames::coerce_frame;

/// The field's value, or `T::default()` when it is null or of the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Items that parse as `T`; anything else in the list is skipped. A value
/// that is not a list reads as empty.
pub fn valid_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(parse_items(value).unwrap_or_default())
}

/// Like [`valid_items`], but a missing or non-list value stays `None`.
pub fn optional_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(parse_items(value))
}

fn parse_items<T: DeserializeOwned>(value: JsonValue) -> Option<Vec<T>> {
    match value {
        JsonValue::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    }
}

/// A number, or a numeric string. Anything else is `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match &value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite()))
}

/// Integer frame via [`coerce_frame`]. Fails when the value cannot be read as
/// a frame, so the enclosing item is dropped by [`valid_items`].
pub fn frame<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    coerce_frame(&value).ok_or_else(|| D::Error::custom(format!("not a frame: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "or_default")]
        flag: bool,
        #[serde(default, deserialize_with = "valid_items")]
        counts: Vec<u32>,
        #[serde(default, deserialize_with = "optional_items")]
        tags: Option<Vec<String>>,
        #[serde(default, deserialize_with = "number")]
        scale: Option<f64>,
    }

    #[test]
    fn bad_values_fall_back_field_by_field() {
        let s: Sample = serde_json::from_value(json!({
            "flag": null,
            "counts": [1, "two", 3, -4],
            "tags": "not a list",
            "scale": "2.5"
        }))
        .unwrap();
        assert!(!s.flag);
        assert_eq!(s.counts, vec![1, 3]);
        assert_eq!(s.tags, None);
        assert_eq!(s.scale, Some(2.5));

        let s: Sample = serde_json::from_value(json!({"flag": true, "tags": [], "scale": [1]}))
            .unwrap();
        assert!(s.flag);
        assert_eq!(s.tags, Some(vec![]));
        assert_eq!(s.scale, None);
    }
}
