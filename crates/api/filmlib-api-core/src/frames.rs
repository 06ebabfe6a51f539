//! Lenient frame coercion for hand-edited or foreign library files.

use serde_json::Value as JsonValue;

/// Integer frame from a JSON number or numeric string; fractional numbers are
/// truncated toward zero. Anything else is `None`.
pub fn coerce_frame(value: &JsonValue) -> Option<i32> {
    match value {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc())
                    .filter(|f| *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                    .map(|f| f as i32)
            }
        }
        JsonValue::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}
