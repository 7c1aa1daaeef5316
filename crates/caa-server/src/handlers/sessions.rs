//! Plan edit session handlers.
//!
//! A session is opened from a program's saved plan, edited with command
//! batches, and either committed back to the program or cancelled.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use caa_core::id::ProgramId;

use crate::error::ApiError;
use crate::schema::sessions::{CommandBatchRequest, CommitResponse, SessionView};
use crate::session::{EditSession, SessionId};
use crate::service::StudioService;
use crate::state::AppState;

fn view(service: &StudioService, session: &EditSession) -> SessionView {
    SessionView {
        session_id: session.id,
        program_id: session.program_id,
        rows: service.row_views(&session.list),
    }
}

fn session_gone(id: SessionId) -> ApiError {
    ApiError::NotFound(format!("edit session {}", id))
}

/// Opens an edit session over the program's saved plan.
///
/// `POST /programs/{id}/sessions`
pub async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let service = state.service.lock().await;
    let program_id = ProgramId(id);
    let list = service.load_list(program_id)?;
    let session_id = state.sessions.open(program_id, list);
    let session = state.sessions.get(&session_id).ok_or_else(|| session_gone(session_id))?;
    Ok((StatusCode::CREATED, Json(view(&service, &session))))
}

/// `GET /sessions/{session_id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&session_id).ok_or_else(|| session_gone(session_id))?;
    let service = state.service.lock().await;
    Ok(Json(view(&service, &session)))
}

/// Applies a batch of edits. Either every command applies or none does.
///
/// `POST /sessions/{session_id}/commands`
pub async fn apply_commands(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(req): Json<CommandBatchRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let service = state.service.lock().await;
    let commands = service.resolve_commands(req.commands)?;
    let session = state
        .sessions
        .apply(&session_id, commands)
        .ok_or_else(|| session_gone(session_id))??;
    Ok(Json(view(&service, &session)))
}

/// Saves the session's list to its program and closes the session.
///
/// The session is read under the service lock, so batches queued ahead of
/// the commit are part of what gets saved. A failed save leaves the session
/// open.
///
/// `POST /sessions/{session_id}/commit`
pub async fn commit_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<CommitResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let session = state.sessions.take(&session_id).ok_or_else(|| session_gone(session_id))?;
    let items = match service.save_list(session.program_id, &session.list) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(session = %session_id, error = %err, "edit session commit failed");
            state.sessions.restore(session);
            return Err(err);
        }
    };
    tracing::info!(session = %session_id, program = %session.program_id, "edit session committed");
    Ok(Json(CommitResponse {
        program_id: session.program_id,
        items,
    }))
}

/// Discards a session without saving.
///
/// `DELETE /sessions/{session_id}`
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.sessions.close(&session_id) {
        return Err(session_gone(session_id));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
