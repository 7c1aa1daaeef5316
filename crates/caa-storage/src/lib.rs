//! Storage for the studio: persons, the exercise catalog, programs and their
//! plan items.
//!
//! [`StudioStore`] is the contract; [`InMemoryStore`] and [`SqliteStore`]
//! are the two backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ProgramSummary listing type
//! - [`traits`]: StudioStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::StudioStore;
pub use types::ProgramSummary;
