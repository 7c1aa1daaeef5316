//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one API area.
//! Domain records from caa-core are returned as-is where they already have
//! the right shape.

pub mod common;
pub mod exercises;
pub mod persons;
pub mod programs;
pub mod sessions;
