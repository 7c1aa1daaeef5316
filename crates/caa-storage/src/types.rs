//! Storage-layer listing types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caa_core::id::{PersonId, ProgramId};

/// Summary of a stored program (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub person_id: PersonId,
    /// Full name of the trainee the program belongs to.
    pub person_name: String,
    pub name: String,
    pub date: NaiveDate,
}
