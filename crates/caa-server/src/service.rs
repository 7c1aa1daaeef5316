//! StudioService: the single coordinator between HTTP handlers and the
//! core/storage crates.
//!
//! Handlers stay thin and delegate here. The service validates drafts,
//! enforces uniqueness with readable conflicts, resolves editor input against
//! the exercise catalog, and builds reports.

use caa_core::catalog::{CatalogMatch, ExerciseCatalog};
use caa_core::command::EditCommand;
use caa_core::error::ValidationError;
use caa_core::id::{ExerciseId, PersonId, ProgramId};
use caa_core::labels::{RepeatUnitLabels, StaticLabels};
use caa_core::records::{Exercise, ExerciseDraft, Person, PersonDraft, Program, ProgramDraft};
use caa_core::report::{self, MeasurementRow, ProgramSheet};
use caa_core::selection::ExerciseSelectionList;
use caa_core::types::{ExerciseEntry, PersistedExerciseItem};
use caa_storage::{InMemoryStore, ProgramSummary, SqliteStore, StudioStore};

use crate::error::{ApiError, ValidationIssue};
use crate::schema::sessions::{CommandRequest, EntryInput, RowView};

/// The central service for persons, the catalog, programs and plans.
pub struct StudioService {
    store: Box<dyn StudioStore + Send>,
    labels: StaticLabels,
}

impl StudioService {
    /// Creates a service over the SQLite database at `db_path`.
    pub fn new(db_path: &str, labels: StaticLabels) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)?;
        Ok(Self::with_store(Box::new(store), labels))
    }

    /// Creates a service over a throwaway in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(InMemoryStore::new()), StaticLabels::english())
    }

    pub fn with_store(store: Box<dyn StudioStore + Send>, labels: StaticLabels) -> Self {
        StudioService { store, labels }
    }

    pub fn labels(&self) -> &StaticLabels {
        &self.labels
    }

    // -----------------------------------------------------------------------
    // Persons
    // -----------------------------------------------------------------------

    pub fn list_persons(&self, query: Option<&str>) -> Result<Vec<Person>, ApiError> {
        Ok(match non_blank(query) {
            Some(q) => self.store.search_persons(q)?,
            None => self.store.list_persons()?,
        })
    }

    pub fn get_person(&self, id: PersonId) -> Result<Person, ApiError> {
        Ok(self.store.get_person(id)?)
    }

    pub fn create_person(&mut self, draft: PersonDraft) -> Result<Person, ApiError> {
        let draft = draft.validated()?;
        self.ensure_mobile_free(&draft.mobile_number, None)?;
        let person = self.store.create_person(&draft)?;
        tracing::info!(person = %person.id, "person created");
        Ok(person)
    }

    pub fn update_person(&mut self, id: PersonId, draft: PersonDraft) -> Result<Person, ApiError> {
        let draft = draft.validated()?;
        self.store.get_person(id)?;
        self.ensure_mobile_free(&draft.mobile_number, Some(id))?;
        Ok(self.store.update_person(id, &draft)?)
    }

    pub fn delete_person(&mut self, id: PersonId) -> Result<(), ApiError> {
        self.store.delete_person(id)?;
        tracing::info!(person = %id, "person deleted");
        Ok(())
    }

    pub fn person_programs(&self, id: PersonId) -> Result<Vec<Program>, ApiError> {
        Ok(self.store.list_programs_for_person(id)?)
    }

    /// Measurement history across the person's programs, oldest first.
    pub fn measurement_history(&self, id: PersonId) -> Result<(Vec<ProgramId>, Vec<MeasurementRow>), ApiError> {
        let programs = self.store.list_programs_for_person(id)?;
        let ids = programs.iter().map(|p| p.id).collect();
        Ok((ids, report::measurement_history(&programs)))
    }

    fn ensure_mobile_free(&self, mobile: &str, except: Option<PersonId>) -> Result<(), ApiError> {
        match self.store.find_person_by_mobile(mobile)? {
            Some(other) if Some(other.id) != except => Err(ApiError::Conflict(format!(
                "mobile number '{}' is already registered to person {}",
                mobile, other.id
            ))),
            _ => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Exercises
    // -----------------------------------------------------------------------

    pub fn list_exercises(&self, query: Option<&str>) -> Result<Vec<Exercise>, ApiError> {
        Ok(match non_blank(query) {
            Some(q) => self.store.search_exercises(q)?,
            None => self.store.list_exercises()?,
        })
    }

    /// Picker lookup for the plan editor.
    pub fn search_catalog(&self, query: &str) -> Result<Vec<CatalogMatch>, ApiError> {
        Ok(self
            .store
            .search_exercises(query)?
            .iter()
            .map(CatalogMatch::from)
            .collect())
    }

    pub fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError> {
        Ok(self.store.get_exercise(id)?)
    }

    pub fn create_exercise(&mut self, draft: ExerciseDraft) -> Result<Exercise, ApiError> {
        let draft = draft.validated()?;
        self.ensure_exercise_free(&draft, None)?;
        let exercise = self.store.create_exercise(&draft)?;
        tracing::info!(exercise = %exercise.id, name = %exercise.name, "exercise created");
        Ok(exercise)
    }

    pub fn update_exercise(&mut self, id: ExerciseId, draft: ExerciseDraft) -> Result<Exercise, ApiError> {
        let draft = draft.validated()?;
        self.store.get_exercise(id)?;
        self.ensure_exercise_free(&draft, Some(id))?;
        Ok(self.store.update_exercise(id, &draft)?)
    }

    pub fn delete_exercise(&mut self, id: ExerciseId) -> Result<(), ApiError> {
        self.store.delete_exercise(id)?;
        tracing::info!(exercise = %id, "exercise deleted");
        Ok(())
    }

    fn ensure_exercise_free(&self, draft: &ExerciseDraft, except: Option<ExerciseId>) -> Result<(), ApiError> {
        if let Some(other) = self.store.find_exercise_by_name(&draft.name)? {
            if Some(other.id) != except {
                return Err(ApiError::Conflict(format!(
                    "an exercise named '{}' already exists",
                    draft.name
                )));
            }
        }
        if let Some(code) = &draft.code {
            if let Some(other) = self.store.find_exercise_by_code(code)? {
                if Some(other.id) != except {
                    return Err(ApiError::Conflict(format!(
                        "exercise code '{}' is already used by '{}'",
                        code, other.name
                    )));
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    pub fn list_programs(&self) -> Result<Vec<ProgramSummary>, ApiError> {
        Ok(self.store.list_programs()?)
    }

    pub fn get_program(&self, id: ProgramId) -> Result<Program, ApiError> {
        Ok(self.store.get_program(id)?)
    }

    pub fn create_program(&mut self, draft: ProgramDraft) -> Result<Program, ApiError> {
        let draft = draft.validated()?;
        let program = self.store.create_program(&draft)?;
        tracing::info!(program = %program.id, person = %program.person_id, "program created");
        Ok(program)
    }

    pub fn update_program(&mut self, id: ProgramId, draft: ProgramDraft) -> Result<Program, ApiError> {
        let draft = draft.validated()?;
        Ok(self.store.update_program(id, &draft)?)
    }

    pub fn delete_program(&mut self, id: ProgramId) -> Result<(), ApiError> {
        self.store.delete_program(id)?;
        tracing::info!(program = %id, "program deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plans
    // -----------------------------------------------------------------------

    pub fn load_items(&self, id: ProgramId) -> Result<Vec<PersistedExerciseItem>, ApiError> {
        Ok(self.store.load_items(id)?)
    }

    /// Loads the saved plan as an editable list.
    pub fn load_list(&self, id: ProgramId) -> Result<ExerciseSelectionList, ApiError> {
        let items = self.store.load_items(id)?;
        Ok(ExerciseSelectionList::from_persisted(&items))
    }

    /// Replaces a plan from flat items.
    ///
    /// The items are checked the way an edit would check them (non-zero
    /// counts, one set count per row group) and saved with rows renumbered
    /// densely in first-seen order.
    pub fn save_items(&mut self, id: ProgramId, items: &[PersistedExerciseItem]) -> Result<Vec<PersistedExerciseItem>, ApiError> {
        let issues: Vec<ValidationIssue> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let field = if item.exercise_set == 0 {
                    "exercise_set"
                } else if item.exercise_repeat == 0 {
                    "exercise_repeat"
                } else {
                    return None;
                };
                Some(ValidationIssue::at(index, &ValidationError::MissingField { field }))
            })
            .collect();
        if !issues.is_empty() {
            return Err(ApiError::ValidationFailed(issues));
        }

        let list = ExerciseSelectionList::from_persisted(items);
        for row in list.rows() {
            let expected = row.set_count();
            if let Some(bad) = row.entries().iter().find(|e| e.set_count() != expected) {
                return Err(ValidationError::SetCountMismatch {
                    row: row.row_number(),
                    expected,
                    actual: bad.set_count(),
                }
                .into());
            }
        }
        self.save_list(id, &list)
    }

    /// Flattens and stores an edited list, returning what was saved.
    pub fn save_list(&mut self, id: ProgramId, list: &ExerciseSelectionList) -> Result<Vec<PersistedExerciseItem>, ApiError> {
        let items = list.flatten();
        self.store.save_items(id, &items)?;
        tracing::info!(program = %id, rows = list.len(), entries = items.len(), "plan saved");
        Ok(self.store.load_items(id)?)
    }

    /// Resolves editor commands into core commands.
    ///
    /// Exercise ids are looked up in the catalog (the entry takes the
    /// catalog name) and counts are parsed from form input. Every command is
    /// checked; all problems are reported together.
    pub fn resolve_commands(&self, requests: Vec<CommandRequest>) -> Result<Vec<EditCommand>, ApiError> {
        let exercises = self.store.list_exercises()?;
        let catalog = exercises.as_slice();

        let mut commands = Vec::with_capacity(requests.len());
        let mut issues = Vec::new();
        for (index, request) in requests.into_iter().enumerate() {
            match resolve_command(catalog, request) {
                Ok(command) => commands.push(command),
                Err(Resolve::UnknownExercise(id)) => {
                    return Err(ApiError::NotFound(format!(
                        "exercise {} (command {})",
                        id, index
                    )))
                }
                Err(Resolve::Invalid(err)) => issues.push(ValidationIssue::at(index, &err)),
            }
        }
        if !issues.is_empty() {
            return Err(ApiError::ValidationFailed(issues));
        }
        Ok(commands)
    }

    /// Row views of a list with this service's labels.
    pub fn row_views(&self, list: &ExerciseSelectionList) -> Vec<RowView> {
        row_views(list, &self.labels)
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    pub fn program_sheet(&self, id: ProgramId) -> Result<ProgramSheet, ApiError> {
        let program = self.store.get_program(id)?;
        let person = self.store.get_person(program.person_id)?;
        let exercises = self.store.list_exercises()?;
        let items = self.store.load_items(id)?;
        Ok(report::program_sheet(&program, &person, &exercises, &items))
    }
}

enum Resolve {
    UnknownExercise(ExerciseId),
    Invalid(ValidationError),
}

impl From<ValidationError> for Resolve {
    fn from(err: ValidationError) -> Self {
        Resolve::Invalid(err)
    }
}

fn resolve_entry<C: ExerciseCatalog + ?Sized>(catalog: &C, input: EntryInput) -> Result<ExerciseEntry, Resolve> {
    let found = catalog
        .resolve(input.exercise_id)
        .ok_or(Resolve::UnknownExercise(input.exercise_id))?;
    let sets = input.set_count.parse("set_count")?;
    let repeats = input.repeat_count.parse("repeat_count")?;
    Ok(ExerciseEntry::new(found.id, found.display_name, sets, repeats, input.repeat_unit)?)
}

fn resolve_command(catalog: &[Exercise], request: CommandRequest) -> Result<EditCommand, Resolve> {
    Ok(match request {
        CommandRequest::AddEntry { target, entry } => EditCommand::AddEntry {
            target,
            entry: resolve_entry(catalog, entry)?,
        },
        CommandRequest::ReplaceEntry { row, position, entry } => EditCommand::ReplaceEntry {
            row,
            position,
            entry: resolve_entry(catalog, entry)?,
        },
        CommandRequest::RemoveEntry { row, position } => EditCommand::RemoveEntry { row, position },
        CommandRequest::RemoveRow { row } => EditCommand::RemoveRow { row },
        CommandRequest::MoveRowUp { row } => EditCommand::MoveRowUp { row },
        CommandRequest::MoveRowDown { row } => EditCommand::MoveRowDown { row },
    })
}

pub fn row_views(list: &ExerciseSelectionList, labels: &impl RepeatUnitLabels) -> Vec<RowView> {
    list.rows()
        .iter()
        .map(|row| RowView {
            row_number: row.row_number(),
            label: row.label(labels),
            set_count: row.set_count(),
            entries: row.entries().to_vec(),
        })
        .collect()
}

fn non_blank(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
