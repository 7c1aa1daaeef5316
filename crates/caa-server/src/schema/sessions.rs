//! Edit session request/response types.
//!
//! Commands arrive with an exercise id and raw counts; the service resolves
//! them against the catalog into core [`EditCommand`](caa_core::EditCommand)s.

use serde::{Deserialize, Serialize};

use caa_core::id::{ExerciseId, ProgramId};
use caa_core::selection::RowTarget;
use caa_core::types::{ExerciseEntry, PersistedExerciseItem, RepeatUnit};

use super::common::NumberInput;
use crate::session::SessionId;

/// Entry fields as sent by an editor form.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    pub exercise_id: ExerciseId,
    pub set_count: NumberInput,
    pub repeat_count: NumberInput,
    pub repeat_unit: RepeatUnit,
}

/// One edit, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum CommandRequest {
    AddEntry { target: RowTarget, entry: EntryInput },
    ReplaceEntry { row: u32, position: usize, entry: EntryInput },
    RemoveEntry { row: u32, position: usize },
    RemoveRow { row: u32 },
    MoveRowUp { row: u32 },
    MoveRowDown { row: u32 },
}

/// Commands applied in order, all or nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandBatchRequest {
    pub commands: Vec<CommandRequest>,
}

/// One row of an open session.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub row_number: u32,
    pub label: String,
    pub set_count: u32,
    pub entries: Vec<ExerciseEntry>,
}

/// Current state of an edit session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub program_id: ProgramId,
    pub rows: Vec<RowView>,
}

/// Result of committing a session.
#[derive(Debug, Clone, Serialize)]
pub struct CommitResponse {
    pub program_id: ProgramId,
    pub items: Vec<PersistedExerciseItem>,
}
