use serde::{Deserialize, Deserializer};

/// Canonical comparison key for a device name: surrounding and internal whitespace
/// removed, lowercased. `" Vivo  V19 "` and `"vivo v19"` share the key `"vivov19"`.
pub fn normalize_device(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits a comma-separated `compatibleDevices` field into trimmed, non-empty names.
pub fn split_devices(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accepts JSON numbers and numeric strings; anything else becomes `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

pub fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_dimension(s),
        _ => None,
    }
}

/// Parses a dimension string such as `"160.5"` or `" 74.2 mm "`.
pub fn parse_dimension(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let numeric = trimmed
        .strip_suffix("mm")
        .or_else(|| trimmed.strip_suffix("MM"))
        .unwrap_or(trimmed)
        .trim();

    numeric
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
