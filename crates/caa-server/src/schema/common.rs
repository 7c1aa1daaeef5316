//! Shared request pieces: search queries and form numbers.

use serde::{Deserialize, Serialize};

use caa_core::error::ValidationError;
use caa_core::input::parse_count;

/// `?q=` on list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// A count sent either as a JSON number or as text typed into a form.
///
/// Text may use Persian or Arabic-Indic digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(u32),
    Text(String),
}

impl NumberInput {
    pub fn parse(&self, field: &'static str) -> Result<u32, ValidationError> {
        match self {
            NumberInput::Number(n) => Ok(*n),
            NumberInput::Text(text) => parse_count(text, field),
        }
    }
}
