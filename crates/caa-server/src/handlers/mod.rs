//! HTTP handler modules for the studio API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`StudioService`](crate::service::StudioService),
//! and return JSON responses. No business logic lives in handlers.

pub mod exercises;
pub mod health;
pub mod persons;
pub mod programs;
pub mod sessions;
