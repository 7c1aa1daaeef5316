//! Plan-level value types: repeat units, exercise entries, and the flat
//! persisted item format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::ExerciseId;

/// How an entry's repeat count is measured.
///
/// Serialized as the one-letter codes used by the plan storage format. The
/// older server wrote `"T"` for counted repetitions; it is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatUnit {
    #[serde(rename = "S")]
    Seconds,
    #[serde(rename = "M")]
    Minutes,
    #[serde(rename = "C", alias = "T")]
    Count,
}

impl RepeatUnit {
    /// All units in display order.
    pub const ALL: [RepeatUnit; 3] = [RepeatUnit::Seconds, RepeatUnit::Minutes, RepeatUnit::Count];

    /// The storage code for this unit.
    pub fn code(self) -> &'static str {
        match self {
            RepeatUnit::Seconds => "S",
            RepeatUnit::Minutes => "M",
            RepeatUnit::Count => "C",
        }
    }

    /// Parses a storage code, accepting the legacy `"T"` for counts.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim() {
            "S" => Ok(RepeatUnit::Seconds),
            "M" => Ok(RepeatUnit::Minutes),
            "C" | "T" => Ok(RepeatUnit::Count),
            other => Err(ValidationError::InvalidValue {
                field: "repeat_unit",
                value: other.to_string(),
            }),
        }
    }

    /// Compact symbol used on the printed program sheet.
    pub fn sheet_symbol(self) -> &'static str {
        match self {
            RepeatUnit::Seconds => "\"",
            RepeatUnit::Minutes => "'",
            RepeatUnit::Count => "",
        }
    }
}

impl fmt::Display for RepeatUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One exercise in a program row.
///
/// Entries are immutable once built; an edit replaces the whole entry.
/// Deserialization runs the same checks as [`ExerciseEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryFields")]
pub struct ExerciseEntry {
    exercise_id: ExerciseId,
    display_name: String,
    set_count: u32,
    repeat_count: u32,
    repeat_unit: RepeatUnit,
}

impl ExerciseEntry {
    /// Builds a validated entry.
    ///
    /// The display name must be non-blank and both counts must be at least 1.
    pub fn new(
        exercise_id: ExerciseId,
        display_name: impl Into<String>,
        set_count: u32,
        repeat_count: u32,
        repeat_unit: RepeatUnit,
    ) -> Result<Self, ValidationError> {
        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(ValidationError::MissingField { field: "display_name" });
        }
        if set_count == 0 {
            return Err(ValidationError::MissingField { field: "set_count" });
        }
        if repeat_count == 0 {
            return Err(ValidationError::MissingField { field: "repeat_count" });
        }
        Ok(ExerciseEntry {
            exercise_id,
            display_name,
            set_count,
            repeat_count,
            repeat_unit,
        })
    }

    pub fn exercise_id(&self) -> ExerciseId {
        self.exercise_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_count(&self) -> u32 {
        self.set_count
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn repeat_unit(&self) -> RepeatUnit {
        self.repeat_unit
    }

    /// Converts to the flat persisted form under the given row group.
    pub fn to_persisted(&self, group: u32) -> PersistedExerciseItem {
        PersistedExerciseItem {
            id: group,
            exercise_id: self.exercise_id,
            exercise_name: self.display_name.clone(),
            exercise_set: self.set_count,
            exercise_repeat: self.repeat_count,
            exercise_repeat_type: self.repeat_unit,
        }
    }
}

#[derive(Deserialize)]
struct EntryFields {
    exercise_id: ExerciseId,
    display_name: String,
    set_count: u32,
    repeat_count: u32,
    repeat_unit: RepeatUnit,
}

impl TryFrom<EntryFields> for ExerciseEntry {
    type Error = ValidationError;

    fn try_from(f: EntryFields) -> Result<Self, Self::Error> {
        ExerciseEntry::new(f.exercise_id, f.display_name, f.set_count, f.repeat_count, f.repeat_unit)
    }
}

impl From<&PersistedExerciseItem> for ExerciseEntry {
    /// Stored items are trusted as-is; validation happens at edit time.
    fn from(item: &PersistedExerciseItem) -> Self {
        ExerciseEntry {
            exercise_id: item.exercise_id,
            display_name: item.exercise_name.clone(),
            set_count: item.exercise_set,
            repeat_count: item.exercise_repeat,
            repeat_unit: item.exercise_repeat_type,
        }
    }
}

/// Flat storage/wire record for one entry of a program plan.
///
/// `id` is the row group: every entry of one superset carries the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedExerciseItem {
    pub id: u32,
    pub exercise_id: ExerciseId,
    #[serde(default)]
    pub exercise_name: String,
    pub exercise_set: u32,
    pub exercise_repeat: u32,
    pub exercise_repeat_type: RepeatUnit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_unit_codes() {
        for unit in RepeatUnit::ALL {
            assert_eq!(RepeatUnit::from_code(unit.code()).unwrap(), unit);
        }
        assert_eq!(RepeatUnit::from_code("T").unwrap(), RepeatUnit::Count);
        assert!(matches!(
            RepeatUnit::from_code("X"),
            Err(ValidationError::InvalidValue { field: "repeat_unit", .. })
        ));
    }

    #[test]
    fn repeat_unit_accepts_legacy_count_code_in_json() {
        let unit: RepeatUnit = serde_json::from_str("\"T\"").unwrap();
        assert_eq!(unit, RepeatUnit::Count);
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"C\"");
    }

    #[test]
    fn entry_requires_name_and_counts() {
        let err = ExerciseEntry::new(ExerciseId(1), "  ", 3, 10, RepeatUnit::Count).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "display_name" });

        let err = ExerciseEntry::new(ExerciseId(1), "Squat", 0, 10, RepeatUnit::Count).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "set_count" });

        let err = ExerciseEntry::new(ExerciseId(1), "Squat", 3, 0, RepeatUnit::Count).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "repeat_count" });
    }

    #[test]
    fn entry_json_goes_through_the_same_checks() {
        let entry: ExerciseEntry = serde_json::from_value(serde_json::json!({
            "exercise_id": 3,
            "display_name": " Squat ",
            "set_count": 3,
            "repeat_count": 10,
            "repeat_unit": "C"
        }))
        .unwrap();
        assert_eq!(entry.display_name(), "Squat");

        let zero_sets = serde_json::json!({
            "exercise_id": 3,
            "display_name": "Squat",
            "set_count": 0,
            "repeat_count": 10,
            "repeat_unit": "C"
        });
        assert!(serde_json::from_value::<ExerciseEntry>(zero_sets).is_err());

        let blank_name = serde_json::json!({
            "exercise_id": 3,
            "display_name": "   ",
            "set_count": 3,
            "repeat_count": 10,
            "repeat_unit": "C"
        });
        assert!(serde_json::from_value::<ExerciseEntry>(blank_name).is_err());
    }

    #[test]
    fn entry_trims_display_name() {
        let entry = ExerciseEntry::new(ExerciseId(5), " Squat ", 3, 10, RepeatUnit::Count).unwrap();
        assert_eq!(entry.display_name(), "Squat");
    }

    #[test]
    fn persisted_item_uses_storage_field_names() {
        let entry = ExerciseEntry::new(ExerciseId(5), "Plank", 2, 45, RepeatUnit::Seconds).unwrap();
        let json = serde_json::to_value(entry.to_persisted(4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 4,
                "exercise_id": 5,
                "exercise_name": "Plank",
                "exercise_set": 2,
                "exercise_repeat": 45,
                "exercise_repeat_type": "S"
            })
        );
    }
}
