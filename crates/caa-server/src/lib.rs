//! HTTP/JSON API for the training studio: persons, the exercise catalog,
//! programs, plan edit sessions and printable reports.
//!
//! This crate contains the service layer, API schema types, error handling,
//! session registry and route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod session;
pub mod state;
