//! Merge directive parsing.
//!
//! A directive is a JSON object mapping `"#RRGGBBAA"` source colors to
//! `"#RRGGBBAA"` targets. It is optional input, so a directive that cannot
//! be understood merges nothing instead of failing the run.

use serde_json::Value;
use stitch_chart::{ColorMapping, Rgba};

/// Parse a merge directive, degrading to an empty mapping.
///
/// - blank input, invalid JSON, or a JSON value other than an object yield
///   an empty mapping
/// - entries whose key or value is not a hex color (or whose value is not a
///   string) are skipped
pub fn parse_mapping(input: &str) -> ColorMapping {
    let input = input.trim();
    if input.is_empty() {
        return ColorMapping::new();
    }

    let object = match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "Merge mapping is not a JSON object, ignoring");
            return ColorMapping::new();
        }
        Err(e) => {
            tracing::warn!(%e, "Merge mapping is not valid JSON, ignoring");
            return ColorMapping::new();
        }
    };

    let mut mapping = ColorMapping::new();
    for (key, value) in &object {
        let Some(target) = value.as_str() else {
            tracing::warn!(from = %key, "Merge target is not a string, skipping");
            continue;
        };
        match (key.parse::<Rgba>(), target.parse::<Rgba>()) {
            (Ok(source), Ok(target)) => mapping.insert(source, target),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(from = %key, to = target, %e, "Invalid merge entry, skipping");
            }
        }
    }

    tracing::debug!(entries = mapping.len(), "Parsed merge mapping");
    mapping
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
