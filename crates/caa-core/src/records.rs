//! Studio records: trainees, catalog exercises, and programs.
//!
//! Each record has a `*Draft` counterpart carrying the editable fields. Drafts
//! validate and normalize themselves before they reach storage; uniqueness
//! rules that need a lookup live in the service layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{ExerciseId, PersonId, ProgramId};
use crate::input::parse_code;

/// A trainee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub father_name: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Person {
    pub fn from_draft(id: PersonId, draft: PersonDraft) -> Self {
        Person {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            mobile_number: draft.mobile_number,
            father_name: draft.father_name,
            address: draft.address,
            birth_date: draft.birth_date,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Editable fields of a [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonDraft {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl PersonDraft {
    /// Trims text fields; a mobile number is required.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.mobile_number = crate::input::normalize_digits(self.mobile_number.trim());
        self.father_name = non_blank(self.father_name);
        self.address = non_blank(self.address);
        if self.mobile_number.is_empty() {
            return Err(ValidationError::MissingField { field: "mobile_number" });
        }
        Ok(self)
    }
}

/// A catalog exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub latin_name: String,
    pub involved_muscle: String,
    pub code: Option<String>,
}

impl Exercise {
    pub fn from_draft(id: ExerciseId, draft: ExerciseDraft) -> Self {
        Exercise {
            id,
            name: draft.name,
            latin_name: draft.latin_name,
            involved_muscle: draft.involved_muscle,
            code: draft.code,
        }
    }
}

/// Editable fields of an [`Exercise`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latin_name: String,
    #[serde(default)]
    pub involved_muscle: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ExerciseDraft {
    /// Trims the name (required) and normalizes the optional numeric code.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.latin_name = self.latin_name.trim().to_string();
        self.involved_muscle = self.involved_muscle.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        self.code = match self.code.take() {
            Some(code) => parse_code(&code, "code")?,
            None => None,
        };
        Ok(self)
    }
}

/// Body measurements recorded when a program is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMeasurements {
    pub age: u32,
    pub height: u32,
    pub weight: f64,
    pub chest: u32,
    pub waist: u32,
    pub abdomen: u32,
    pub arm: u32,
    pub forearm: u32,
    pub thigh: u32,
    pub shin: u32,
    pub hip: u32,
    pub fat_percentage: f64,
    pub fat_weight: f64,
    pub muscle_weight: f64,
    pub score: f64,
}

/// A workout program for one trainee.
///
/// The exercise plan itself is stored separately as persisted items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub person_id: PersonId,
    pub name: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub measurements: BodyMeasurements,
}

impl Program {
    pub fn from_draft(id: ProgramId, draft: ProgramDraft) -> Self {
        Program {
            id,
            person_id: draft.person_id,
            name: draft.name,
            date: draft.date,
            description: draft.description,
            measurements: draft.measurements,
        }
    }
}

/// Editable fields of a [`Program`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDraft {
    pub person_id: PersonId,
    #[serde(default)]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub measurements: BodyMeasurements,
}

impl ProgramDraft {
    /// A program needs a name.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.description = non_blank(self.description);
        if self.name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
