//! Total helpers for extracting typed parameters from a `serde_json::Value`.
//!
//! Each helper takes a JSON object, a key, and a default. Missing keys and
//! wrong types fall back to the default — host-supplied configuration can
//! never fail, only be ignored.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing,
/// negative, fractional, or wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_extracts_existing_value() {
        let params = json!({"viscosity": 0.002});
        assert!((param_f64(&params, "viscosity", 1.0) - 0.002).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_accepts_integers() {
        let params = json!({"scale": 100});
        assert!((param_f64(&params, "scale", 0.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_wrong_type() {
        assert!((param_f64(&json!({}), "dt", 2.0) - 2.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!({"dt": "fast"}), "dt", 2.0) - 2.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!("not an object"), "dt", 2.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_extracts_existing_value() {
        assert_eq!(param_usize(&json!({"iters": 20}), "iters", 1), 20);
    }

    #[test]
    fn param_usize_falls_back_for_negative_or_fractional() {
        assert_eq!(param_usize(&json!({"iters": -1}), "iters", 12), 12);
        assert_eq!(param_usize(&json!({"iters": 2.5}), "iters", 12), 12);
    }

    #[test]
    fn param_bool_extracts_and_falls_back() {
        assert!(!param_bool(&json!({"ambient": false}), "ambient", true));
        assert!(param_bool(&json!({}), "ambient", true));
        assert!(param_bool(&json!({"ambient": 1}), "ambient", true));
    }
}
