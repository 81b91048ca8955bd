use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Regex for the color directive at the start of a comment
    /// - Valid: "[color:#ff0000]", "[color:amarelo] texto"
    /// - Invalid: "[color:]", "nota [color:#fff]", "[colour:#fff]"
    pub static ref COLOR_DIRECTIVE_REGEX: Regex = Regex::new(r"^\[color:([^\]\s]+)\]").unwrap();

    /// Regex for tag values: no whitespace at the edges, no commas
    /// - Valid: "midjourney", "retrato", "lo-fi beat"
    /// - Invalid: "", " spaced", "a,b"
    pub static ref TAG_REGEX: Regex = Regex::new(r"^[^\s,](?:[^,]*[^\s,])?$").unwrap();
}

/// Trim an identifier and reject it when empty
pub fn require_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("id must not be empty".to_string()));
    }
    Ok(id)
}

/// Trim a text field, mapping blank input to `None`
pub fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
