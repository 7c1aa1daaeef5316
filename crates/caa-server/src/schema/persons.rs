//! Person request/response types.

use serde::Serialize;

use caa_core::id::{PersonId, ProgramId};
use caa_core::records::{Person, Program};
use caa_core::report::MeasurementRow;

#[derive(Debug, Clone, Serialize)]
pub struct PersonListResponse {
    pub persons: Vec<Person>,
}

/// Programs of one person, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct PersonProgramsResponse {
    pub person_id: PersonId,
    pub programs: Vec<Program>,
}

/// Measurement history: one column per program, in `programs` order.
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementHistoryResponse {
    pub person_id: PersonId,
    pub programs: Vec<ProgramId>,
    pub rows: Vec<MeasurementRow>,
}
