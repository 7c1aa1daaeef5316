//! Application state shared by the axum handlers.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>`. The async
//! mutex lets handlers await the lock without blocking the runtime; an
//! `RwLock` is not an option because `rusqlite::Connection` is `!Sync`.
//! Edit sessions live outside the service lock in a [`SessionRegistry`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::StudioService;
use crate::session::SessionRegistry;

/// How often idle sessions are looked for.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared studio service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<StudioService>>,
    /// Open plan edit sessions.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates state backed by the SQLite database named in `config` and
    /// starts the idle-session sweep.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let service = StudioService::new(&config.db_path, config.labels.clone())?;
        let sessions = Arc::new(SessionRegistry::new());
        sessions.start_expiry_sweep(SWEEP_INTERVAL, config.session_timeout);

        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            sessions,
        })
    }

    /// Creates state over an in-memory store (for testing). No sweep task
    /// is started.
    pub fn in_memory() -> Self {
        Self::with_service(StudioService::in_memory())
    }

    pub fn with_service(service: StudioService) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
