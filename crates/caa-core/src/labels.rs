//! Display labels for repeat units.
//!
//! The label text is supplied from outside the plan model; [`StaticLabels`]
//! carries the two tables the studio ships with.

use serde::{Deserialize, Serialize};

use crate::types::RepeatUnit;

/// Maps a [`RepeatUnit`] to the text shown next to a repeat count.
pub trait RepeatUnitLabels {
    fn label(&self, unit: RepeatUnit) -> &str;
}

/// A fixed label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLabels {
    pub seconds: String,
    pub minutes: String,
    pub count: String,
}

impl StaticLabels {
    pub fn english() -> Self {
        StaticLabels {
            seconds: "sec".to_string(),
            minutes: "min".to_string(),
            count: "reps".to_string(),
        }
    }

    pub fn persian() -> Self {
        StaticLabels {
            seconds: "ثانیه".to_string(),
            minutes: "دقیقه".to_string(),
            count: "تکرار".to_string(),
        }
    }

    /// Picks a table by locale tag (`"en"` or `"fa"`).
    pub fn for_locale(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Self::english()),
            "fa" | "fa-ir" => Some(Self::persian()),
            _ => None,
        }
    }
}

impl Default for StaticLabels {
    fn default() -> Self {
        Self::english()
    }
}

impl RepeatUnitLabels for StaticLabels {
    fn label(&self, unit: RepeatUnit) -> &str {
        match unit {
            RepeatUnit::Seconds => &self.seconds,
            RepeatUnit::Minutes => &self.minutes,
            RepeatUnit::Count => &self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_lookup() {
        assert_eq!(StaticLabels::for_locale("EN"), Some(StaticLabels::english()));
        assert_eq!(StaticLabels::for_locale("fa"), Some(StaticLabels::persian()));
        assert_eq!(StaticLabels::for_locale("de"), None);
    }

    #[test]
    fn persian_count_label() {
        assert_eq!(StaticLabels::persian().label(RepeatUnit::Count), "تکرار");
    }
}
