//! Label and value formatting for report rows.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").unwrap());

/// Convert a camelCase (or snake_case) report key to a Title Case label,
/// e.g. `serviceIntentionality` → "Service Intentionality".
pub fn format_key(key: &str) -> String {
    let spaced = UPPERCASE.replace_all(key, " $1").replace('_', " ");
    let spaced = spaced.trim();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Human-readable form of a report value. Strings come through verbatim,
/// nulls render blank, anything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
