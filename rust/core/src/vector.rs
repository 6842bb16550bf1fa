// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial vector codec
//!
//! Element vectors travel in two shapes: a legacy bracketed string such as
//! `"[1.5, 0, -2]"` (older records also use `"['1.5','0','-2']"`) and plain
//! JSON arrays. Decoding never fails: anything that does not yield three
//! finite numbers falls back to a caller-supplied default.

use crate::Vec3;
use serde_json::Value;

/// Decimal places used for values captured from interactive edits
pub const EDIT_PRECISION: usize = 2;

/// Most decimal places [`round_to`] honors; `f64` carries about 15 significant digits.
pub const MAX_PRECISION: usize = 15;

/// Decode a raw vector field (string, array or absent).
///
/// Arrays take their first three numeric-coercible entries. Strings have
/// single quotes normalized to double quotes and are parsed as a JSON array
/// literal. Every other shape returns `fallback`.
pub fn decode(raw: Option<&Value>, fallback: Vec3) -> Vec3 {
    match raw {
        Some(Value::String(text)) => decode_str(text, fallback),
        Some(Value::Array(items)) => decode_items(items).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Decode the legacy string form.
pub fn decode_str(text: &str, fallback: Vec3) -> Vec3 {
    let normalized = text.trim().replace('\'', "\"");
    match serde_json::from_str::<Vec<Value>>(&normalized) {
        Ok(items) => decode_items(&items).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn decode_items(items: &[Value]) -> Option<Vec3> {
    if items.len() < 3 {
        return None;
    }
    Some(Vec3::new(
        coerce(&items[0])?,
        coerce(&items[1])?,
        coerce(&items[2])?,
    ))
}

/// Numbers pass through, numeric strings are parsed; non-finite is rejected.
fn coerce(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Encode a vector in the canonical `[x, y, z]` form.
///
/// Uses the shortest decimal text that parses back to the same value, so
/// `decode(encode(v)) == v` for every finite `v`. Never emits an exponent.
pub fn encode(v: &Vec3) -> String {
    format!("[{}, {}, {}]", v.x, v.y, v.z)
}

/// Encode a vector with a fixed number of decimal places.
pub fn encode_fixed(v: &Vec3, decimals: usize) -> String {
    format!(
        "[{:.*}, {:.*}, {:.*}]",
        decimals, v.x, decimals, v.y, decimals, v.z
    )
}

/// Round every component to `decimals` places.
///
/// Keeps discrete fields equal to what [`encode_fixed`] writes to the mirror.
/// `decimals` is capped at [`MAX_PRECISION`]. Components too large to scale
/// are returned unchanged.
pub fn round_to(v: &Vec3, decimals: usize) -> Vec3 {
    let factor = 10f64.powi(decimals.min(MAX_PRECISION) as i32);
    v.map(|c| {
        let scaled = c * factor;
        if scaled.is_finite() {
            scaled.round() / factor
        } else {
            c
        }
    })
}

/// Replace non-finite components with zero.
#[inline]
pub fn sanitize(v: &Vec3) -> Vec3 {
    v.map(|c| if c.is_finite() { c } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> Vec3 {
        Vec3::new(9.0, 9.0, 9.0)
    }

    #[test]
    fn test_decode_double_quoted_string() {
        let v = decode_str("[1.5, 0, -2]", Vec3::zeros());
        assert_eq!(v, Vec3::new(1.5, 0.0, -2.0));
    }

    #[test]
    fn test_decode_single_quoted_legacy_string() {
        let v = decode_str("['1.5', '2', '-3.25']", Vec3::zeros());
        assert_eq!(v, Vec3::new(1.5, 2.0, -3.25));
    }

    #[test]
    fn test_decode_array_takes_first_three() {
        let raw = json!([1, "2.5", 3, 4]);
        assert_eq!(decode(Some(&raw), fallback()), Vec3::new(1.0, 2.5, 3.0));
    }

    #[test]
    fn test_decode_absent_returns_fallback() {
        assert_eq!(decode(None, fallback()), fallback());
        assert_eq!(decode(Some(&Value::Null), fallback()), fallback());
        assert_eq!(decode(Some(&json!(42)), fallback()), fallback());
    }

    #[test]
    fn test_decode_malformed_strings_return_fallback() {
        let inputs = [
            "",
            "[",
            "[1, 2]",
            "[1, 2, x]",
            "1, 2, 3",
            "{\"x\": 1}",
            "[1, 2, \"NaN\"]",
            "['1', null, '3']",
            "[[1], [2], [3]]",
            "[1,,2,3]",
        ];
        for input in inputs {
            assert_eq!(decode_str(input, fallback()), fallback(), "input: {input:?}");
        }
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.23, -4.56, 7.89),
            Vec3::new(0.1 + 0.2, 1.0 / 3.0, -1e-7),
            Vec3::new(1e21, -123456789.125, 2.5e-5),
        ];
        for v in samples {
            let text = encode(&v);
            assert!(!text.contains('e'), "exponent in {text}");
            assert_eq!(decode_str(&text, fallback()), v);
        }
    }

    #[test]
    fn test_encode_fixed() {
        let v = Vec3::new(1.234, 0.5, -4.0);
        assert_eq!(encode_fixed(&v, 2), "[1.23, 0.50, -4.00]");
        assert_eq!(decode_str(&encode_fixed(&v, 2), fallback()), Vec3::new(1.23, 0.5, -4.0));
    }

    #[test]
    fn test_round_to_matches_fixed_encoding() {
        let v = Vec3::new(1.23, 3.0 - 2.5, -4.56);
        let rounded = round_to(&v, EDIT_PRECISION);
        assert_eq!(rounded, Vec3::new(1.23, 0.5, -4.56));
        assert_eq!(decode_str(&encode_fixed(&v, EDIT_PRECISION), fallback()), rounded);
    }

    #[test]
    fn test_round_to_caps_precision() {
        let v = Vec3::new(1.5, 2.0, -0.125);
        assert_eq!(round_to(&v, 400), v);
        assert_eq!(round_to(&v, usize::MAX), v);

        let huge = Vec3::new(1e300, -1e300, 0.5);
        assert_eq!(round_to(&huge, MAX_PRECISION), huge);
        assert_eq!(round_to(&huge, 0), Vec3::new(1e300, -1e300, 1.0));
    }

    #[test]
    fn test_sanitize() {
        let v = sanitize(&Vec3::new(f64::NAN, 2.0, f64::NEG_INFINITY));
        assert_eq!(v, Vec3::new(0.0, 2.0, 0.0));
    }
}
