//! In-memory implementation of [`StudioStore`].
//!
//! [`InMemoryStore`] backs tests and throwaway servers. Records live in
//! ordered maps keyed by id, with the same semantics as the SQLite backend.

use std::collections::BTreeMap;

use caa_core::id::{ExerciseId, PersonId, ProgramId};
use caa_core::records::{Exercise, ExerciseDraft, Person, PersonDraft, Program, ProgramDraft};
use caa_core::types::{PersistedExerciseItem, RepeatUnit};

use crate::error::StorageError;
use crate::traits::StudioStore;
use crate::types::ProgramSummary;

/// A plan item as stored; the exercise name is looked up on load.
#[derive(Debug, Clone)]
struct StoredItem {
    group: u32,
    exercise_id: ExerciseId,
    sets: u32,
    repeats: u32,
    unit: RepeatUnit,
}

/// In-memory implementation of [`StudioStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    persons: BTreeMap<PersonId, Person>,
    exercises: BTreeMap<ExerciseId, Exercise>,
    programs: BTreeMap<ProgramId, Program>,
    items: BTreeMap<ProgramId, Vec<StoredItem>>,
    next_person_id: i64,
    next_exercise_id: i64,
    next_program_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_mobile_free(&self, mobile: &str, except: Option<PersonId>) -> Result<(), StorageError> {
        let taken = self
            .persons
            .values()
            .any(|p| p.mobile_number == mobile && Some(p.id) != except);
        if taken {
            return Err(StorageError::IntegrityError {
                reason: format!("mobile number '{}' is already registered", mobile),
            });
        }
        Ok(())
    }

    fn check_exercise_free(&self, draft: &ExerciseDraft, except: Option<ExerciseId>) -> Result<(), StorageError> {
        for other in self.exercises.values().filter(|e| Some(e.id) != except) {
            if other.name == draft.name {
                return Err(StorageError::IntegrityError {
                    reason: format!("exercise name '{}' already exists", draft.name),
                });
            }
            if draft.code.is_some() && other.code == draft.code {
                return Err(StorageError::IntegrityError {
                    reason: format!(
                        "exercise code '{}' already exists",
                        draft.code.as_deref().unwrap_or_default()
                    ),
                });
            }
        }
        Ok(())
    }

    fn person_name(&self, id: PersonId) -> String {
        self.persons.get(&id).map(Person::full_name).unwrap_or_default()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl StudioStore for InMemoryStore {
    // -----------------------------------------------------------------------
    // Persons
    // -----------------------------------------------------------------------

    fn create_person(&mut self, draft: &PersonDraft) -> Result<Person, StorageError> {
        self.check_mobile_free(&draft.mobile_number, None)?;
        self.next_person_id += 1;
        let person = Person::from_draft(PersonId(self.next_person_id), draft.clone());
        self.persons.insert(person.id, person.clone());
        Ok(person)
    }

    fn update_person(&mut self, id: PersonId, draft: &PersonDraft) -> Result<Person, StorageError> {
        if !self.persons.contains_key(&id) {
            return Err(StorageError::PersonNotFound(id.0));
        }
        self.check_mobile_free(&draft.mobile_number, Some(id))?;
        let person = Person::from_draft(id, draft.clone());
        self.persons.insert(id, person.clone());
        Ok(person)
    }

    fn get_person(&self, id: PersonId) -> Result<Person, StorageError> {
        self.persons
            .get(&id)
            .cloned()
            .ok_or(StorageError::PersonNotFound(id.0))
    }

    fn list_persons(&self) -> Result<Vec<Person>, StorageError> {
        Ok(self.persons.values().cloned().collect())
    }

    fn search_persons(&self, query: &str) -> Result<Vec<Person>, StorageError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .persons
            .values()
            .filter(|p| {
                contains_ignore_case(&p.first_name, &needle)
                    || contains_ignore_case(&p.last_name, &needle)
                    || contains_ignore_case(&p.mobile_number, &needle)
            })
            .cloned()
            .collect())
    }

    fn find_person_by_mobile(&self, mobile: &str) -> Result<Option<Person>, StorageError> {
        Ok(self.persons.values().find(|p| p.mobile_number == mobile).cloned())
    }

    fn delete_person(&mut self, id: PersonId) -> Result<(), StorageError> {
        if !self.persons.contains_key(&id) {
            return Err(StorageError::PersonNotFound(id.0));
        }
        if self.programs.values().any(|p| p.person_id == id) {
            return Err(StorageError::InUse { entity: "person", id: id.0 });
        }
        self.persons.remove(&id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Exercises
    // -----------------------------------------------------------------------

    fn create_exercise(&mut self, draft: &ExerciseDraft) -> Result<Exercise, StorageError> {
        self.check_exercise_free(draft, None)?;
        self.next_exercise_id += 1;
        let exercise = Exercise::from_draft(ExerciseId(self.next_exercise_id), draft.clone());
        self.exercises.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    fn update_exercise(&mut self, id: ExerciseId, draft: &ExerciseDraft) -> Result<Exercise, StorageError> {
        if !self.exercises.contains_key(&id) {
            return Err(StorageError::ExerciseNotFound(id.0));
        }
        self.check_exercise_free(draft, Some(id))?;
        let exercise = Exercise::from_draft(id, draft.clone());
        self.exercises.insert(id, exercise.clone());
        Ok(exercise)
    }

    fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, StorageError> {
        self.exercises
            .get(&id)
            .cloned()
            .ok_or(StorageError::ExerciseNotFound(id.0))
    }

    fn list_exercises(&self) -> Result<Vec<Exercise>, StorageError> {
        Ok(self.exercises.values().cloned().collect())
    }

    fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>, StorageError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .exercises
            .values()
            .filter(|e| contains_ignore_case(&e.name, &needle))
            .cloned()
            .collect())
    }

    fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, StorageError> {
        Ok(self.exercises.values().find(|e| e.name == name).cloned())
    }

    fn find_exercise_by_code(&self, code: &str) -> Result<Option<Exercise>, StorageError> {
        Ok(self
            .exercises
            .values()
            .find(|e| e.code.as_deref() == Some(code))
            .cloned())
    }

    fn delete_exercise(&mut self, id: ExerciseId) -> Result<(), StorageError> {
        if !self.exercises.contains_key(&id) {
            return Err(StorageError::ExerciseNotFound(id.0));
        }
        let used = self
            .items
            .values()
            .flatten()
            .any(|item| item.exercise_id == id);
        if used {
            return Err(StorageError::InUse { entity: "exercise", id: id.0 });
        }
        self.exercises.remove(&id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    fn create_program(&mut self, draft: &ProgramDraft) -> Result<Program, StorageError> {
        if !self.persons.contains_key(&draft.person_id) {
            return Err(StorageError::PersonNotFound(draft.person_id.0));
        }
        self.next_program_id += 1;
        let program = Program::from_draft(ProgramId(self.next_program_id), draft.clone());
        self.programs.insert(program.id, program.clone());
        Ok(program)
    }

    fn update_program(&mut self, id: ProgramId, draft: &ProgramDraft) -> Result<Program, StorageError> {
        if !self.programs.contains_key(&id) {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        if !self.persons.contains_key(&draft.person_id) {
            return Err(StorageError::PersonNotFound(draft.person_id.0));
        }
        let program = Program::from_draft(id, draft.clone());
        self.programs.insert(id, program.clone());
        Ok(program)
    }

    fn get_program(&self, id: ProgramId) -> Result<Program, StorageError> {
        self.programs
            .get(&id)
            .cloned()
            .ok_or(StorageError::ProgramNotFound(id.0))
    }

    fn list_programs(&self) -> Result<Vec<ProgramSummary>, StorageError> {
        Ok(self
            .programs
            .values()
            .map(|p| ProgramSummary {
                id: p.id,
                person_id: p.person_id,
                person_name: self.person_name(p.person_id),
                name: p.name.clone(),
                date: p.date,
            })
            .collect())
    }

    fn list_programs_for_person(&self, person: PersonId) -> Result<Vec<Program>, StorageError> {
        if !self.persons.contains_key(&person) {
            return Err(StorageError::PersonNotFound(person.0));
        }
        let mut programs: Vec<Program> = self
            .programs
            .values()
            .filter(|p| p.person_id == person)
            .cloned()
            .collect();
        programs.sort_by_key(|p| (p.date, p.id));
        Ok(programs)
    }

    fn delete_program(&mut self, id: ProgramId) -> Result<(), StorageError> {
        if self.programs.remove(&id).is_none() {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        self.items.remove(&id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plan items
    // -----------------------------------------------------------------------

    fn save_items(&mut self, program: ProgramId, items: &[PersistedExerciseItem]) -> Result<(), StorageError> {
        if !self.programs.contains_key(&program) {
            return Err(StorageError::ProgramNotFound(program.0));
        }
        if let Some(missing) = items.iter().find(|i| !self.exercises.contains_key(&i.exercise_id)) {
            return Err(StorageError::ExerciseNotFound(missing.exercise_id.0));
        }
        let stored = items
            .iter()
            .map(|i| StoredItem {
                group: i.id,
                exercise_id: i.exercise_id,
                sets: i.exercise_set,
                repeats: i.exercise_repeat,
                unit: i.exercise_repeat_type,
            })
            .collect();
        self.items.insert(program, stored);
        Ok(())
    }

    fn load_items(&self, program: ProgramId) -> Result<Vec<PersistedExerciseItem>, StorageError> {
        if !self.programs.contains_key(&program) {
            return Err(StorageError::ProgramNotFound(program.0));
        }
        let Some(stored) = self.items.get(&program) else {
            return Ok(Vec::new());
        };
        stored
            .iter()
            .map(|s| {
                let exercise = self
                    .exercises
                    .get(&s.exercise_id)
                    .ok_or(StorageError::ExerciseNotFound(s.exercise_id.0))?;
                Ok(PersistedExerciseItem {
                    id: s.group,
                    exercise_id: s.exercise_id,
                    exercise_name: exercise.name.clone(),
                    exercise_set: s.sets,
                    exercise_repeat: s.repeats,
                    exercise_repeat_type: s.unit,
                })
            })
            .collect()
    }
}
