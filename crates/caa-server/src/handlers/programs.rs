//! Program handlers (CRUD, saved plans, program sheet).

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use caa_core::id::ProgramId;
use caa_core::records::{Program, ProgramDraft};

use crate::error::ApiError;
use crate::schema::programs::{ItemsResponse, ProgramListResponse, SaveItemsRequest, SheetQuery};
use crate::state::AppState;

/// `GET /programs`
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<ProgramListResponse>, ApiError> {
    let service = state.service.lock().await;
    let programs = service.list_programs()?;
    Ok(Json(ProgramListResponse { programs }))
}

/// `POST /programs`
pub async fn create_program(
    State(state): State<AppState>,
    Json(draft): Json<ProgramDraft>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    let mut service = state.service.lock().await;
    let program = service.create_program(draft)?;
    Ok((StatusCode::CREATED, Json(program)))
}

/// `GET /programs/{id}`
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Program>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_program(ProgramId(id))?))
}

/// `PUT /programs/{id}`
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ProgramDraft>,
) -> Result<Json<Program>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.update_program(ProgramId(id), draft)?))
}

/// Deletes a program and its plan.
///
/// `DELETE /programs/{id}`
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_program(ProgramId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `GET /programs/{id}/items`
pub async fn load_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let service = state.service.lock().await;
    let program_id = ProgramId(id);
    let items = service.load_items(program_id)?;
    Ok(Json(ItemsResponse { program_id, items }))
}

/// Replaces the saved plan with the given flat items.
///
/// `PUT /programs/{id}/items`
pub async fn save_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaveItemsRequest>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let program_id = ProgramId(id);
    let items = service.save_items(program_id, &req.items)?;
    Ok(Json(ItemsResponse { program_id, items }))
}

/// The printable program sheet, as JSON or (`?format=text`) plain text.
///
/// `GET /programs/{id}/sheet`
pub async fn program_sheet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<SheetQuery>,
) -> Result<Response, ApiError> {
    let service = state.service.lock().await;
    let sheet = service.program_sheet(ProgramId(id))?;
    match query.format.as_deref() {
        None | Some("json") => Ok(Json(sheet).into_response()),
        Some("text") => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            sheet.render_text(),
        )
            .into_response()),
        Some(other) => Err(ApiError::BadRequest(format!(
            "unknown sheet format '{}' (expected 'json' or 'text')",
            other
        ))),
    }
}
