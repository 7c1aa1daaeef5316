//! Program request/response types.

use serde::{Deserialize, Serialize};

use caa_core::id::ProgramId;
use caa_core::types::PersistedExerciseItem;
use caa_storage::ProgramSummary;

#[derive(Debug, Clone, Serialize)]
pub struct ProgramListResponse {
    pub programs: Vec<ProgramSummary>,
}

/// Request to replace a program's plan.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveItemsRequest {
    pub items: Vec<PersistedExerciseItem>,
}

/// A program's saved plan in flat form.
#[derive(Debug, Clone, Serialize)]
pub struct ItemsResponse {
    pub program_id: ProgramId,
    pub items: Vec<PersistedExerciseItem>,
}

/// `?format=` on the sheet endpoint: `json` (default) or `text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetQuery {
    pub format: Option<String>,
}
