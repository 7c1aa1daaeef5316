//! SQLite implementation of [`StudioStore`].
//!
//! [`SqliteStore`] keeps studio data in a SQLite database with WAL mode,
//! foreign keys, a transaction around every write, and automatic schema
//! migrations. Program measurements are stored as a JSON TEXT column via
//! serde_json; dates are ISO `YYYY-MM-DD` text.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use caa_core::id::{ExerciseId, PersonId, ProgramId};
use caa_core::records::{
    BodyMeasurements, Exercise, ExerciseDraft, Person, PersonDraft, Program, ProgramDraft,
};
use caa_core::types::{PersistedExerciseItem, RepeatUnit};

use crate::error::StorageError;
use crate::traits::StudioStore;
use crate::types::ProgramSummary;

const PERSON_COLUMNS: &str =
    "id, first_name, last_name, mobile_number, father_name, address, birth_date";
const EXERCISE_COLUMNS: &str = "id, name, latin_name, involved_muscle, code";
const PROGRAM_COLUMNS: &str = "id, person_id, name, date, description, measurements";

/// SQLite-backed implementation of [`StudioStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn exists(tx: &Connection, sql: &str, id: i64) -> Result<bool, StorageError> {
        Ok(tx.query_row(sql, params![id], |row| row.get(0))?)
    }

    fn assert_person_exists(conn: &Connection, id: PersonId) -> Result<(), StorageError> {
        if !Self::exists(conn, "SELECT EXISTS(SELECT 1 FROM persons WHERE id = ?1)", id.0)? {
            return Err(StorageError::PersonNotFound(id.0));
        }
        Ok(())
    }

    fn assert_exercise_exists(conn: &Connection, id: ExerciseId) -> Result<(), StorageError> {
        if !Self::exists(conn, "SELECT EXISTS(SELECT 1 FROM exercises WHERE id = ?1)", id.0)? {
            return Err(StorageError::ExerciseNotFound(id.0));
        }
        Ok(())
    }

    fn assert_program_exists(conn: &Connection, id: ProgramId) -> Result<(), StorageError> {
        if !Self::exists(conn, "SELECT EXISTS(SELECT 1 FROM programs WHERE id = ?1)", id.0)? {
            return Err(StorageError::ProgramNotFound(id.0));
        }
        Ok(())
    }

    fn check_mobile_free(
        tx: &Transaction<'_>,
        mobile: &str,
        except: Option<PersonId>,
    ) -> Result<(), StorageError> {
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM persons WHERE mobile_number = ?1 AND id IS NOT ?2)",
            params![mobile, except.map(|id| id.0)],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::IntegrityError {
                reason: format!("mobile number '{}' is already registered", mobile),
            });
        }
        Ok(())
    }

    fn check_exercise_free(
        tx: &Transaction<'_>,
        draft: &ExerciseDraft,
        except: Option<ExerciseId>,
    ) -> Result<(), StorageError> {
        let except = except.map(|id| id.0);
        let name_taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM exercises WHERE name = ?1 AND id IS NOT ?2)",
            params![draft.name, except],
            |row| row.get(0),
        )?;
        if name_taken {
            return Err(StorageError::IntegrityError {
                reason: format!("exercise name '{}' already exists", draft.name),
            });
        }
        if let Some(code) = &draft.code {
            let code_taken: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM exercises WHERE code = ?1 AND id IS NOT ?2)",
                params![code, except],
                |row| row.get(0),
            )?;
            if code_taken {
                return Err(StorageError::IntegrityError {
                    reason: format!("exercise code '{}' already exists", code),
                });
            }
        }
        Ok(())
    }

    fn query_persons(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Person>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, person_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn query_exercises(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Exercise>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, exercise_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let birth_date: Option<String> = row.get(6)?;
    Ok(Person {
        id: PersonId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        mobile_number: row.get(3)?,
        father_name: row.get(4)?,
        address: row.get(5)?,
        birth_date: birth_date.as_deref().map(|d| parse_date(6, d)).transpose()?,
    })
}

fn exercise_from_row(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: ExerciseId(row.get(0)?),
        name: row.get(1)?,
        latin_name: row.get(2)?,
        involved_muscle: row.get(3)?,
        code: row.get(4)?,
    })
}

fn program_from_row(row: &Row<'_>) -> rusqlite::Result<Program> {
    let date: String = row.get(3)?;
    let measurements: String = row.get(5)?;
    let measurements: BodyMeasurements =
        serde_json::from_str(&measurements).map_err(|e| conversion_error(5, e))?;
    Ok(Program {
        id: ProgramId(row.get(0)?),
        person_id: PersonId(row.get(1)?),
        name: row.get(2)?,
        date: parse_date(3, &date)?,
        description: row.get(4)?,
        measurements,
    })
}

/// `%query%` with LIKE wildcards in the query escaped by `\`.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::from("%");
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl StudioStore for SqliteStore {
    // -----------------------------------------------------------------------
    // Persons
    // -----------------------------------------------------------------------

    fn create_person(&mut self, draft: &PersonDraft) -> Result<Person, StorageError> {
        let tx = self.conn.transaction()?;
        Self::check_mobile_free(&tx, &draft.mobile_number, None)?;
        tx.execute(
            "INSERT INTO persons (first_name, last_name, mobile_number, father_name, address, birth_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.first_name,
                draft.last_name,
                draft.mobile_number,
                draft.father_name,
                draft.address,
                draft.birth_date.map(format_date),
            ],
        )?;
        let id = PersonId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Person::from_draft(id, draft.clone()))
    }

    fn update_person(&mut self, id: PersonId, draft: &PersonDraft) -> Result<Person, StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_person_exists(&tx, id)?;
        Self::check_mobile_free(&tx, &draft.mobile_number, Some(id))?;
        tx.execute(
            "UPDATE persons SET first_name = ?2, last_name = ?3, mobile_number = ?4,
                 father_name = ?5, address = ?6, birth_date = ?7
             WHERE id = ?1",
            params![
                id.0,
                draft.first_name,
                draft.last_name,
                draft.mobile_number,
                draft.father_name,
                draft.address,
                draft.birth_date.map(format_date),
            ],
        )?;
        tx.commit()?;
        Ok(Person::from_draft(id, draft.clone()))
    }

    fn get_person(&self, id: PersonId) -> Result<Person, StorageError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM persons WHERE id = ?1", PERSON_COLUMNS),
                params![id.0],
                person_from_row,
            )
            .optional()?
            .ok_or(StorageError::PersonNotFound(id.0))
    }

    fn list_persons(&self) -> Result<Vec<Person>, StorageError> {
        self.query_persons(
            &format!("SELECT {} FROM persons ORDER BY id", PERSON_COLUMNS),
            params![],
        )
    }

    fn search_persons(&self, query: &str) -> Result<Vec<Person>, StorageError> {
        self.query_persons(
            &format!(
                "SELECT {} FROM persons
                 WHERE first_name LIKE ?1 ESCAPE '\\'
                    OR last_name LIKE ?1 ESCAPE '\\'
                    OR mobile_number LIKE ?1 ESCAPE '\\'
                 ORDER BY id",
                PERSON_COLUMNS
            ),
            params![like_pattern(query)],
        )
    }

    fn find_person_by_mobile(&self, mobile: &str) -> Result<Option<Person>, StorageError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM persons WHERE mobile_number = ?1", PERSON_COLUMNS),
                params![mobile],
                person_from_row,
            )
            .optional()?)
    }

    fn delete_person(&mut self, id: PersonId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_person_exists(&tx, id)?;
        if Self::exists(&tx, "SELECT EXISTS(SELECT 1 FROM programs WHERE person_id = ?1)", id.0)? {
            return Err(StorageError::InUse { entity: "person", id: id.0 });
        }
        tx.execute("DELETE FROM persons WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Exercises
    // -----------------------------------------------------------------------

    fn create_exercise(&mut self, draft: &ExerciseDraft) -> Result<Exercise, StorageError> {
        let tx = self.conn.transaction()?;
        Self::check_exercise_free(&tx, draft, None)?;
        tx.execute(
            "INSERT INTO exercises (name, latin_name, involved_muscle, code) VALUES (?1, ?2, ?3, ?4)",
            params![draft.name, draft.latin_name, draft.involved_muscle, draft.code],
        )?;
        let id = ExerciseId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Exercise::from_draft(id, draft.clone()))
    }

    fn update_exercise(&mut self, id: ExerciseId, draft: &ExerciseDraft) -> Result<Exercise, StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_exercise_exists(&tx, id)?;
        Self::check_exercise_free(&tx, draft, Some(id))?;
        tx.execute(
            "UPDATE exercises SET name = ?2, latin_name = ?3, involved_muscle = ?4, code = ?5
             WHERE id = ?1",
            params![id.0, draft.name, draft.latin_name, draft.involved_muscle, draft.code],
        )?;
        tx.commit()?;
        Ok(Exercise::from_draft(id, draft.clone()))
    }

    fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, StorageError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM exercises WHERE id = ?1", EXERCISE_COLUMNS),
                params![id.0],
                exercise_from_row,
            )
            .optional()?
            .ok_or(StorageError::ExerciseNotFound(id.0))
    }

    fn list_exercises(&self) -> Result<Vec<Exercise>, StorageError> {
        self.query_exercises(
            &format!("SELECT {} FROM exercises ORDER BY id", EXERCISE_COLUMNS),
            params![],
        )
    }

    fn search_exercises(&self, query: &str) -> Result<Vec<Exercise>, StorageError> {
        self.query_exercises(
            &format!(
                "SELECT {} FROM exercises WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id",
                EXERCISE_COLUMNS
            ),
            params![like_pattern(query)],
        )
    }

    fn find_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, StorageError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM exercises WHERE name = ?1", EXERCISE_COLUMNS),
                params![name],
                exercise_from_row,
            )
            .optional()?)
    }

    fn find_exercise_by_code(&self, code: &str) -> Result<Option<Exercise>, StorageError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM exercises WHERE code = ?1", EXERCISE_COLUMNS),
                params![code],
                exercise_from_row,
            )
            .optional()?)
    }

    fn delete_exercise(&mut self, id: ExerciseId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_exercise_exists(&tx, id)?;
        if Self::exists(
            &tx,
            "SELECT EXISTS(SELECT 1 FROM program_items WHERE exercise_id = ?1)",
            id.0,
        )? {
            return Err(StorageError::InUse { entity: "exercise", id: id.0 });
        }
        tx.execute("DELETE FROM exercises WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    fn create_program(&mut self, draft: &ProgramDraft) -> Result<Program, StorageError> {
        let measurements = serde_json::to_string(&draft.measurements)?;
        let tx = self.conn.transaction()?;
        Self::assert_person_exists(&tx, draft.person_id)?;
        tx.execute(
            "INSERT INTO programs (person_id, name, date, description, measurements)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.person_id.0,
                draft.name,
                format_date(draft.date),
                draft.description,
                measurements,
            ],
        )?;
        let id = ProgramId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Program::from_draft(id, draft.clone()))
    }

    fn update_program(&mut self, id: ProgramId, draft: &ProgramDraft) -> Result<Program, StorageError> {
        let measurements = serde_json::to_string(&draft.measurements)?;
        let tx = self.conn.transaction()?;
        Self::assert_program_exists(&tx, id)?;
        Self::assert_person_exists(&tx, draft.person_id)?;
        tx.execute(
            "UPDATE programs SET person_id = ?2, name = ?3, date = ?4, description = ?5,
                 measurements = ?6
             WHERE id = ?1",
            params![
                id.0,
                draft.person_id.0,
                draft.name,
                format_date(draft.date),
                draft.description,
                measurements,
            ],
        )?;
        tx.commit()?;
        Ok(Program::from_draft(id, draft.clone()))
    }

    fn get_program(&self, id: ProgramId) -> Result<Program, StorageError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM programs WHERE id = ?1", PROGRAM_COLUMNS),
                params![id.0],
                program_from_row,
            )
            .optional()?
            .ok_or(StorageError::ProgramNotFound(id.0))
    }

    fn list_programs(&self) -> Result<Vec<ProgramSummary>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.person_id, pe.first_name, pe.last_name, p.name, p.date
             FROM programs p JOIN persons pe ON pe.id = p.person_id
             ORDER BY p.id",
        )?;
        let rows = stmt
            .query_map(params![], |row| {
                let first: String = row.get(2)?;
                let last: String = row.get(3)?;
                let date: String = row.get(5)?;
                Ok(ProgramSummary {
                    id: ProgramId(row.get(0)?),
                    person_id: PersonId(row.get(1)?),
                    person_name: format!("{} {}", first, last).trim().to_string(),
                    name: row.get(4)?,
                    date: parse_date(5, &date)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn list_programs_for_person(&self, person: PersonId) -> Result<Vec<Program>, StorageError> {
        Self::assert_person_exists(&self.conn, person)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM programs WHERE person_id = ?1 ORDER BY date, id",
            PROGRAM_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![person.0], program_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn delete_program(&mut self, id: ProgramId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_program_exists(&tx, id)?;
        // Items go through ON DELETE CASCADE.
        tx.execute("DELETE FROM programs WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plan items
    // -----------------------------------------------------------------------

    fn save_items(&mut self, program: ProgramId, items: &[PersistedExerciseItem]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        Self::assert_program_exists(&tx, program)?;
        for item in items {
            Self::assert_exercise_exists(&tx, item.exercise_id)?;
        }

        tx.execute("DELETE FROM program_items WHERE program_id = ?1", params![program.0])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO program_items
                     (program_id, position, group_id, exercise_id, exercise_set, exercise_repeat, repeat_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, item) in items.iter().enumerate() {
                stmt.execute(params![
                    program.0,
                    position as i64,
                    item.id,
                    item.exercise_id.0,
                    item.exercise_set,
                    item.exercise_repeat,
                    item.exercise_repeat_type.code(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_items(&self, program: ProgramId) -> Result<Vec<PersistedExerciseItem>, StorageError> {
        Self::assert_program_exists(&self.conn, program)?;
        let mut stmt = self.conn.prepare(
            "SELECT i.group_id, i.exercise_id, e.name, i.exercise_set, i.exercise_repeat, i.repeat_type
             FROM program_items i JOIN exercises e ON e.id = i.exercise_id
             WHERE i.program_id = ?1
             ORDER BY i.position",
        )?;
        let rows = stmt
            .query_map(params![program.0], |row| {
                let code: String = row.get(5)?;
                Ok(PersistedExerciseItem {
                    id: row.get(0)?,
                    exercise_id: ExerciseId(row.get(1)?),
                    exercise_name: row.get(2)?,
                    exercise_set: row.get(3)?,
                    exercise_repeat: row.get(4)?,
                    exercise_repeat_type: RepeatUnit::from_code(&code)
                        .map_err(|e| conversion_error(5, e))?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
