//! Normalization of numbers typed into editor forms.
//!
//! Trainers enter counts with Persian or Arabic-Indic digits as often as with
//! ASCII ones, so every numeric form field goes through [`parse_count`].

use crate::error::ValidationError;

/// Rewrites Persian (`۰`-`۹`) and Arabic-Indic (`٠`-`٩`) digits as ASCII.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Parses a non-negative count from user text.
pub fn parse_count(text: &str, field: &'static str) -> Result<u32, ValidationError> {
    let normalized = normalize_digits(text.trim());
    if normalized.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    normalized.parse::<u32>().map_err(|_| ValidationError::NotANumber {
        field,
        value: text.to_string(),
    })
}

/// Parses an optional numeric code (e.g. an exercise code).
pub fn parse_code(text: &str, field: &'static str) -> Result<Option<String>, ValidationError> {
    let normalized = normalize_digits(text.trim());
    if normalized.is_empty() {
        return Ok(None);
    }
    if !normalized.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotANumber {
            field,
            value: text.to_string(),
        });
    }
    Ok(Some(normalized))
}
