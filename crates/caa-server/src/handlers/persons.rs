//! Person handlers (CRUD, programs, measurement history).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use caa_core::id::PersonId;
use caa_core::records::{Person, PersonDraft};

use crate::error::ApiError;
use crate::schema::common::SearchQuery;
use crate::schema::persons::{MeasurementHistoryResponse, PersonListResponse, PersonProgramsResponse};
use crate::state::AppState;

/// Lists persons, optionally filtered by name or mobile number.
///
/// `GET /persons?q=`
pub async fn list_persons(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<PersonListResponse>, ApiError> {
    let service = state.service.lock().await;
    let persons = service.list_persons(query.q.as_deref())?;
    Ok(Json(PersonListResponse { persons }))
}

/// `POST /persons`
pub async fn create_person(
    State(state): State<AppState>,
    Json(draft): Json<PersonDraft>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let mut service = state.service.lock().await;
    let person = service.create_person(draft)?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /persons/{id}`
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.get_person(PersonId(id))?))
}

/// `PUT /persons/{id}`
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<PersonDraft>,
) -> Result<Json<Person>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.update_person(PersonId(id), draft)?))
}

/// `DELETE /persons/{id}`
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_person(PersonId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `GET /persons/{id}/programs`
pub async fn person_programs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonProgramsResponse>, ApiError> {
    let service = state.service.lock().await;
    let person_id = PersonId(id);
    let programs = service.person_programs(person_id)?;
    Ok(Json(PersonProgramsResponse { person_id, programs }))
}

/// `GET /persons/{id}/measurements`
pub async fn measurement_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MeasurementHistoryResponse>, ApiError> {
    let service = state.service.lock().await;
    let person_id = PersonId(id);
    let (programs, rows) = service.measurement_history(person_id)?;
    Ok(Json(MeasurementHistoryResponse {
        person_id,
        programs,
        rows,
    }))
}
