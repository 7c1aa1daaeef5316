//! Exercise catalog handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use caa_core::id::ExerciseId;
use caa_core::records::{Exercise, ExerciseDraft};

use crate::error::ApiError;
use crate::schema::common::SearchQuery;
use crate::schema::exercises::{CatalogSearchResponse, ExerciseListResponse};
use crate::state::AppState;

/// `GET /exercises?q=`
pub async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ExerciseListResponse>, ApiError> {
    let service = state.service.lock().await;
    let exercises = service.list_exercises(query.q.as_deref())?;
    Ok(Json(ExerciseListResponse { exercises }))
}

/// Picker lookup used by the plan editor.
///
/// `GET /exercises/search?q=`
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CatalogSearchResponse>, ApiError> {
    let service = state.service.lock().await;
    let matches = service.search_catalog(query.q.as_deref().unwrap_or_default())?;
    Ok(Json(CatalogSearchResponse { matches }))
}

/// `POST /exercises`
pub async fn create_exercise(
    State(state): State<AppState>,
    Json(draft): Json<ExerciseDraft>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    let mut service = state.service.lock().await;
    let exercise = service.create_exercise(draft)?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

/// `GET /exercises/{id}`
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Exercise>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_exercise(ExerciseId(id))?))
}

/// `PUT /exercises/{id}`
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ExerciseDraft>,
) -> Result<Json<Exercise>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.update_exercise(ExerciseId(id), draft)?))
}

/// `DELETE /exercises/{id}`
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_exercise(ExerciseId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
