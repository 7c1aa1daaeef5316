//! Router assembly for the studio HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Persons
        .route(
            "/persons",
            get(handlers::persons::list_persons).post(handlers::persons::create_person),
        )
        .route(
            "/persons/{id}",
            get(handlers::persons::get_person)
                .put(handlers::persons::update_person)
                .delete(handlers::persons::delete_person),
        )
        .route(
            "/persons/{id}/programs",
            get(handlers::persons::person_programs),
        )
        .route(
            "/persons/{id}/measurements",
            get(handlers::persons::measurement_history),
        )
        // Exercise catalog
        .route(
            "/exercises",
            get(handlers::exercises::list_exercises).post(handlers::exercises::create_exercise),
        )
        .route(
            "/exercises/search",
            get(handlers::exercises::search_catalog),
        )
        .route(
            "/exercises/{id}",
            get(handlers::exercises::get_exercise)
                .put(handlers::exercises::update_exercise)
                .delete(handlers::exercises::delete_exercise),
        )
        // Programs
        .route(
            "/programs",
            get(handlers::programs::list_programs).post(handlers::programs::create_program),
        )
        .route(
            "/programs/{id}",
            get(handlers::programs::get_program)
                .put(handlers::programs::update_program)
                .delete(handlers::programs::delete_program),
        )
        .route(
            "/programs/{id}/items",
            get(handlers::programs::load_items).put(handlers::programs::save_items),
        )
        .route(
            "/programs/{id}/sheet",
            get(handlers::programs::program_sheet),
        )
        // Edit sessions
        .route(
            "/programs/{id}/sessions",
            post(handlers::sessions::start_session),
        )
        .route(
            "/sessions/{session_id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::cancel_session),
        )
        .route(
            "/sessions/{session_id}/commands",
            post(handlers::sessions::apply_commands),
        )
        .route(
            "/sessions/{session_id}/commit",
            post(handlers::sessions::commit_session),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
