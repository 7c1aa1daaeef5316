//! Edit sessions over program plans.
//!
//! A session owns one [`ExerciseSelectionList`] loaded from a saved program.
//! Commands mutate only the session's list; nothing reaches storage until the
//! session is committed. [`SessionRegistry`] tracks open sessions by UUID in
//! a `DashMap` and drops sessions that sit idle past a timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caa_core::command::{BatchError, EditCommand};
use caa_core::id::ProgramId;
use caa_core::selection::ExerciseSelectionList;

/// Unique edit session identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An open edit session.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub id: SessionId,
    pub program_id: ProgramId,
    pub list: ExerciseSelectionList,
    pub opened_at: Instant,
    pub last_active: Instant,
}

/// Registry of open edit sessions.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, EditSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: DashMap::new(),
        }
    }

    /// Opens a session over `list`, returning its id.
    pub fn open(&self, program_id: ProgramId, list: ExerciseSelectionList) -> SessionId {
        let id = SessionId(Uuid::new_v4());
        let now = Instant::now();
        self.sessions.insert(
            id,
            EditSession {
                id,
                program_id,
                list,
                opened_at: now,
                last_active: now,
            },
        );
        tracing::debug!(session = %id, program = %program_id, "edit session opened");
        id
    }

    /// Returns a copy of the session, if it is open.
    pub fn get(&self, id: &SessionId) -> Option<EditSession> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    /// Applies a batch to the session's list. `None` if the session is gone.
    ///
    /// A rejected batch leaves the list as it was.
    pub fn apply(
        &self,
        id: &SessionId,
        commands: Vec<EditCommand>,
    ) -> Option<Result<EditSession, BatchError>> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_active = Instant::now();
        let count = commands.len();
        let outcome = match entry.list.apply_batch(commands) {
            Ok(()) => {
                tracing::debug!(session = %id, commands = count, "batch applied");
                Ok(entry.clone())
            }
            Err(err) => {
                tracing::debug!(session = %id, index = err.index, error = %err.error, "batch rejected");
                Err(err)
            }
        };
        Some(outcome)
    }

    /// Removes a session. Returns `true` if it was open.
    pub fn close(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Removes a session and hands it to the caller.
    pub fn take(&self, id: &SessionId) -> Option<EditSession> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    /// Puts back a session removed with [`take`](Self::take).
    pub fn restore(&self, mut session: EditSession) {
        session.last_active = Instant::now();
        self.sessions.insert(session.id, session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops sessions idle for longer than `timeout`. Returns how many went.
    pub fn sweep_inactive(&self, timeout: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let active = now.duration_since(session.last_active) < timeout;
            if !active {
                removed += 1;
            }
            active
        });
        removed
    }

    /// Spawns a background task sweeping idle sessions every `interval`.
    pub fn start_expiry_sweep(self: &Arc<Self>, interval: Duration, timeout: Duration) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let removed = registry.sweep_inactive(timeout);
                if removed > 0 {
                    tracing::info!("Swept {} idle edit session(s)", removed);
                }
            }
        });
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
