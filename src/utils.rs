// Utility functions

/// Formats a millimetre value without trailing zeros: `160.50` -> `"160.5"`.
pub fn format_mm(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Last six characters of a product id, upper-cased, as shown on product cards.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(6);
    chars[start..].iter().collect::<String>().to_uppercase()
}
