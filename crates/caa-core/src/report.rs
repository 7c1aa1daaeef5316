//! Printable views of saved programs: the program sheet handed to a trainee
//! and the measurement history across a trainee's programs.

use std::collections::HashMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use crate::id::ExerciseId;
use crate::records::{BodyMeasurements, Exercise, Person, Program};
use crate::types::PersistedExerciseItem;

/// Top of a program sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetHeader {
    pub program_name: String,
    pub date: String,
    pub person_name: String,
    pub measurements: BodyMeasurements,
}

/// One row group of the sheet.
///
/// `exercises` reads `"2 - Squat + Lunge"`; `sets_and_repeats` reads
/// `"3. 10, 12"` with the unit symbol appended to each repeat count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetLine {
    pub row: u32,
    pub exercises: String,
    pub sets_and_repeats: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSheet {
    pub header: SheetHeader,
    pub lines: Vec<SheetLine>,
}

impl ProgramSheet {
    /// Plain-text rendering: header lines, a blank line, then one aligned
    /// line per row group.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.header.program_name);
        let _ = writeln!(out, "Date: {}", self.header.date);
        let _ = writeln!(out, "Trainee: {}", self.header.person_name);

        if self.lines.is_empty() {
            return out;
        }
        out.push('\n');

        let width = self
            .lines
            .iter()
            .map(|l| l.exercises.chars().count())
            .max()
            .unwrap_or(0);
        for line in &self.lines {
            let pad = width - line.exercises.chars().count();
            let _ = writeln!(
                out,
                "{}{} | {}",
                line.exercises,
                " ".repeat(pad),
                line.sets_and_repeats
            );
        }
        out
    }
}

/// Builds the sheet for a program from its saved items.
///
/// Items are grouped by their row group `id` in first-seen order; the set
/// count shown for a group is that of its first entry. Exercises with a
/// catalog code are written as `(<code>)  <name>`.
pub fn program_sheet(
    program: &Program,
    person: &Person,
    exercises: &[Exercise],
    items: &[PersistedExerciseItem],
) -> ProgramSheet {
    let codes: HashMap<ExerciseId, &str> = exercises
        .iter()
        .filter_map(|ex| ex.code.as_deref().map(|code| (ex.id, code)))
        .collect();

    let mut groups: IndexMap<u32, Vec<&PersistedExerciseItem>> = IndexMap::new();
    for item in items {
        groups.entry(item.id).or_default().push(item);
    }

    let lines = groups
        .into_iter()
        .map(|(row, entries)| {
            let names: Vec<String> = entries
                .iter()
                .map(|e| match codes.get(&e.exercise_id) {
                    Some(code) => format!("({})  {}", code, e.exercise_name),
                    None => e.exercise_name.clone(),
                })
                .collect();
            let repeats: Vec<String> = entries
                .iter()
                .map(|e| format!("{}{}", e.exercise_repeat, e.exercise_repeat_type.sheet_symbol()))
                .collect();
            let sets = entries.first().map(|e| e.exercise_set).unwrap_or_default();
            SheetLine {
                row,
                exercises: format!("{} - {}", row, names.join(" + ")),
                sets_and_repeats: format!("{}. {}", sets, repeats.join(", ")),
            }
        })
        .collect();

    ProgramSheet {
        header: SheetHeader {
            program_name: program.name.clone(),
            date: program.date.format("%Y-%m-%d").to_string(),
            person_name: person.full_name(),
            measurements: program.measurements.clone(),
        },
        lines,
    }
}

/// One measured quantity across several programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasurementRow {
    pub key: &'static str,
    pub label: &'static str,
    pub values: Vec<String>,
}

type Column = fn(&Program) -> String;

const HISTORY_COLUMNS: [(&str, &str, Column); 16] = [
    ("age", "Age", |p| p.measurements.age.to_string()),
    ("height", "Height", |p| p.measurements.height.to_string()),
    ("weight", "Weight", |p| p.measurements.weight.to_string()),
    ("chest", "Chest", |p| p.measurements.chest.to_string()),
    ("waist", "Waist", |p| p.measurements.waist.to_string()),
    ("abdomen", "Abdomen", |p| p.measurements.abdomen.to_string()),
    ("arm", "Arm", |p| p.measurements.arm.to_string()),
    ("forearm", "Forearm", |p| p.measurements.forearm.to_string()),
    ("thigh", "Thigh", |p| p.measurements.thigh.to_string()),
    ("shin", "Shin", |p| p.measurements.shin.to_string()),
    ("hip", "Hip", |p| p.measurements.hip.to_string()),
    ("fat_percentage", "Fat %", |p| p.measurements.fat_percentage.to_string()),
    ("fat_weight", "Fat weight", |p| p.measurements.fat_weight.to_string()),
    ("muscle_weight", "Muscle weight", |p| p.measurements.muscle_weight.to_string()),
    ("score", "Score", |p| p.measurements.score.to_string()),
    ("date", "Date", |p| p.date.format("%Y-%m-%d").to_string()),
];

/// Transposes program measurements into labelled rows, one value per
/// program in the given order.
pub fn measurement_history(programs: &[Program]) -> Vec<MeasurementRow> {
    if programs.is_empty() {
        return Vec::new();
    }
    HISTORY_COLUMNS
        .iter()
        .map(|&(key, label, column)| MeasurementRow {
            key,
            label,
            values: programs.iter().map(column).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::id::{ExerciseId, PersonId, ProgramId};
    use crate::types::RepeatUnit;

    fn person() -> Person {
        Person {
            id: PersonId(1),
            first_name: "Sara".into(),
            last_name: "Ahmadi".into(),
            mobile_number: "0912".into(),
            father_name: None,
            address: None,
            birth_date: None,
        }
    }

    fn program(id: i64, day: u32, weight: f64) -> Program {
        Program {
            id: ProgramId(id),
            person_id: PersonId(1),
            name: "Strength A".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            description: None,
            measurements: BodyMeasurements {
                age: 30,
                weight,
                ..Default::default()
            },
        }
    }

    fn item(id: u32, exercise: i64, name: &str, sets: u32, reps: u32, unit: RepeatUnit) -> PersistedExerciseItem {
        PersistedExerciseItem {
            id,
            exercise_id: ExerciseId(exercise),
            exercise_name: name.into(),
            exercise_set: sets,
            exercise_repeat: reps,
            exercise_repeat_type: unit,
        }
    }

    fn items() -> Vec<PersistedExerciseItem> {
        vec![
            item(1, 1, "Squat", 3, 10, RepeatUnit::Count),
            item(1, 2, "Lunge", 3, 12, RepeatUnit::Count),
            item(2, 3, "Plank", 2, 45, RepeatUnit::Seconds),
            item(3, 4, "Rowing", 1, 5, RepeatUnit::Minutes),
        ]
    }

    fn catalog() -> Vec<Exercise> {
        [(1, "Squat", Some("12")), (2, "Lunge", None), (3, "Plank", Some("7"))]
            .into_iter()
            .map(|(id, name, code): (i64, &str, Option<&str>)| Exercise {
                id: ExerciseId(id),
                name: name.into(),
                latin_name: String::new(),
                involved_muscle: String::new(),
                code: code.map(String::from),
            })
            .collect()
    }

    #[test]
    fn sheet_lines_group_supersets() {
        let sheet = program_sheet(&program(1, 1, 70.0), &person(), &[], &items());
        insta::assert_json_snapshot!(sheet.lines, @r#"
        [
          {
            "row": 1,
            "exercises": "1 - Squat + Lunge",
            "sets_and_repeats": "3. 10, 12"
          },
          {
            "row": 2,
            "exercises": "2 - Plank",
            "sets_and_repeats": "2. 45\""
          },
          {
            "row": 3,
            "exercises": "3 - Rowing",
            "sets_and_repeats": "1. 5'"
          }
        ]
        "#);
    }

    #[test]
    fn sheet_header_uses_iso_date_and_full_name() {
        let sheet = program_sheet(&program(1, 9, 70.0), &person(), &catalog(), &[]);
        assert_eq!(sheet.header.date, "2024-03-09");
        assert_eq!(sheet.header.person_name, "Sara Ahmadi");
        assert!(sheet.lines.is_empty());
    }

    #[test]
    fn render_text_aligns_columns() {
        let sheet = program_sheet(&program(1, 1, 70.0), &person(), &[], &items());
        let expected = "Strength A\n\
                        Date: 2024-03-01\n\
                        Trainee: Sara Ahmadi\n\
                        \n\
                        1 - Squat + Lunge | 3. 10, 12\n\
                        2 - Plank         | 2. 45\"\n\
                        3 - Rowing        | 1. 5'\n";
        assert_eq!(sheet.render_text(), expected);
    }

    #[test]
    fn coded_exercises_are_prefixed() {
        let sheet = program_sheet(&program(1, 1, 70.0), &person(), &catalog(), &items());
        let exercises: Vec<&str> = sheet.lines.iter().map(|l| l.exercises.as_str()).collect();
        assert_eq!(
            exercises,
            vec!["1 - (12)  Squat + Lunge", "2 - (7)  Plank", "3 - Rowing"]
        );
        assert!(sheet.render_text().contains("1 - (12)  Squat + Lunge | 3. 10, 12\n"));
    }

    #[test]
    fn history_has_one_column_per_program() {
        let rows = measurement_history(&[program(1, 1, 70.0), program(2, 15, 68.5)]);
        assert_eq!(rows.len(), 16);
        let weight = rows.iter().find(|r| r.key == "weight").unwrap();
        assert_eq!(weight.values, vec!["70", "68.5"]);
        let date = rows.last().unwrap();
        assert_eq!(date.label, "Date");
        assert_eq!(date.values, vec!["2024-03-01", "2024-03-15"]);
    }

    #[test]
    fn history_of_nothing_is_empty() {
        assert!(measurement_history(&[]).is_empty());
    }
}
