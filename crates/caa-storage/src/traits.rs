//! The [`StudioStore`] trait: the storage contract for studio records and
//! program plans.
//!
//! Both backends ([`InMemoryStore`](crate::InMemoryStore) and
//! [`SqliteStore`](crate::SqliteStore)) implement it with the same semantics
//! and are interchangeable behind the service layer.

use caa_core::id::{ExerciseId, PersonId, ProgramId};
use caa_core::records::{Exercise, ExerciseDraft, Person, PersonDraft, Program, ProgramDraft};
use caa_core::types::PersistedExerciseItem;

use crate::error::StorageError;
use crate::types::ProgramSummary;

/// Storage for persons, the exercise catalog, programs and plan items.
///
/// Drafts are expected to be validated already. Stores still enforce
/// uniqueness (mobile number, exercise name and code) and referential
/// integrity. The trait is synchronous; callers serialize access.
pub trait StudioStore {
    // -------------------------------------------------------------------
    // Persons
    // -------------------------------------------------------------------

    fn create_person(&mut self, draft: &PersonDraft) -> Result<Person, StorageError>;

    fn update_person(&mut self, id: PersonId, draft: &PersonDraft) -> Result<Person, StorageError>;

    fn get_person(&self, id: PersonId) -> Result<Person, StorageError>;

    /// All persons in id order.
    fn list_persons(&self) -> Result<Vec<Person>, StorageError>;

    /// Persons whose first name, last name or mobile number contains
    /// `query` (case-insensitive).
    fn search_persons(&self, query: &str) -> Result<Vec<Person>, StorageError>;

    fn find_person_by_mobile(&self, mobile: &str) -> Result<Option<Person>, StorageError>;

    /// Fails with [`StorageError::InUse`] while programs reference the person.
    fn delete_person(&mut self, id: PersonId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Exercises
    // -------------------------------------------------------------------

    fn create_exercise(&mut self, draft: &ExerciseDraft) -> Result<Exercise, StorageError>;

    fn update_exercise(&mut self, id: ExerciseId, draft: &ExerciseDraft) -> Result<Exercise, StorageError>;

    fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, StorageError>;

    /// All exercises in id order.
    fn list_exercises(&self) -> Result<Vec<Exercise>, StorageError>;

    /// Exercises whose name contains `query` (case-insensitive). A blank
    /// query returns the whole catalog.
    fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>, StorageError>;

    fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, StorageError>;

    fn find_exercise_by_code(&self, code: &str) -> Result<Option<Exercise>, StorageError>;

    /// Fails with [`StorageError::InUse`] while any plan uses the exercise.
    fn delete_exercise(&mut self, id: ExerciseId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Programs
    // -------------------------------------------------------------------

    /// Creates a program for an existing person.
    fn create_program(&mut self, draft: &ProgramDraft) -> Result<Program, StorageError>;

    fn update_program(&mut self, id: ProgramId, draft: &ProgramDraft) -> Result<Program, StorageError>;

    fn get_program(&self, id: ProgramId) -> Result<Program, StorageError>;

    /// Summaries of all programs in id order.
    fn list_programs(&self) -> Result<Vec<ProgramSummary>, StorageError>;

    /// Programs of one person, oldest first (ties by id).
    fn list_programs_for_person(&self, person: PersonId) -> Result<Vec<Program>, StorageError>;

    /// Deletes a program together with its plan items.
    fn delete_program(&mut self, id: ProgramId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Plan items
    // -------------------------------------------------------------------

    /// Replaces the program's plan with `items`, atomically. Every
    /// referenced exercise must exist.
    fn save_items(&mut self, program: ProgramId, items: &[PersistedExerciseItem]) -> Result<(), StorageError>;

    /// Loads the plan in saved order, with names taken from the catalog.
    fn load_items(&self, program: ProgramId) -> Result<Vec<PersistedExerciseItem>, StorageError>;
}
