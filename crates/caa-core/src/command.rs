//! Edit commands over an [`ExerciseSelectionList`].
//!
//! Commands are plain data: whatever drives an edit session (an HTTP handler,
//! a CLI) resolves its input into [`EditCommand`]s and hands them to the list.
//! Batches apply in order and are all-or-nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;
use crate::selection::{ExerciseSelectionList, RowTarget};
use crate::types::ExerciseEntry;

/// A single edit to a program plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditCommand {
    AddEntry { target: RowTarget, entry: ExerciseEntry },
    ReplaceEntry { row: u32, position: usize, entry: ExerciseEntry },
    RemoveEntry { row: u32, position: usize },
    RemoveRow { row: u32 },
    MoveRowUp { row: u32 },
    MoveRowDown { row: u32 },
}

/// A batch stopped at `index`; nothing from the batch was kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command {index} rejected: {error}")]
pub struct BatchError {
    pub index: usize,
    pub error: ValidationError,
}

impl ExerciseSelectionList {
    /// Applies one command.
    pub fn apply(&mut self, command: EditCommand) -> Result<(), ValidationError> {
        match command {
            EditCommand::AddEntry { target, entry } => self.add_entry(target, entry).map(|_| ()),
            EditCommand::ReplaceEntry { row, position, entry } => {
                self.replace_entry(row, position, entry).map(|_| ())
            }
            EditCommand::RemoveEntry { row, position } => self.remove_entry(row, position).map(|_| ()),
            EditCommand::RemoveRow { row } => self.remove_row(row).map(|_| ()),
            EditCommand::MoveRowUp { row } => self.move_row_up(row).map(|_| ()),
            EditCommand::MoveRowDown { row } => self.move_row_down(row).map(|_| ()),
        }
    }

    /// Applies commands in order. On the first failure the list is restored.
    pub fn apply_batch(
        &mut self,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> Result<(), BatchError> {
        let mut staged = self.clone();
        for (index, command) in commands.into_iter().enumerate() {
            staged.apply(command).map_err(|error| BatchError { index, error })?;
        }
        *self = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ExerciseId;
    use crate::types::RepeatUnit;

    fn entry(name: &str, sets: u32) -> ExerciseEntry {
        ExerciseEntry::new(ExerciseId(1), name, sets, 10, RepeatUnit::Count).unwrap()
    }

    #[test]
    fn batch_applies_in_order() {
        let mut list = ExerciseSelectionList::new();
        list.apply_batch(vec![
            EditCommand::AddEntry { target: RowTarget::New, entry: entry("A", 3) },
            EditCommand::AddEntry { target: RowTarget::New, entry: entry("B", 3) },
            EditCommand::AddEntry { target: RowTarget::Row(2), entry: entry("C", 3) },
            EditCommand::MoveRowUp { row: 2 },
        ])
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.rows()[0].entries().len(), 2);
        assert_eq!(list.rows()[0].entries()[0].display_name(), "B");
    }

    #[test]
    fn failed_batch_keeps_nothing() {
        let mut list = ExerciseSelectionList::new();
        list.apply(EditCommand::AddEntry { target: RowTarget::New, entry: entry("A", 3) })
            .unwrap();
        let before = list.clone();

        let err = list
            .apply_batch(vec![
                EditCommand::AddEntry { target: RowTarget::New, entry: entry("B", 4) },
                EditCommand::RemoveRow { row: 9 },
            ])
            .unwrap_err();

        assert_eq!(err.index, 1);
        assert!(matches!(err.error, ValidationError::RowOutOfRange { row: 9, len: 2 }));
        assert_eq!(list, before);
    }

    #[test]
    fn boundary_moves_succeed_without_change() {
        let mut list = ExerciseSelectionList::new();
        list.apply(EditCommand::AddEntry { target: RowTarget::New, entry: entry("A", 3) })
            .unwrap();
        list.apply(EditCommand::MoveRowUp { row: 1 }).unwrap();
        list.apply(EditCommand::MoveRowDown { row: 1 }).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn commands_are_tagged_by_type() {
        let json = serde_json::to_value(EditCommand::RemoveRow { row: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "RemoveRow", "row": 2 }));
    }

    #[test]
    fn commands_with_invalid_entries_do_not_parse() {
        let bad = serde_json::json!({
            "type": "AddEntry",
            "target": "new",
            "entry": {
                "exercise_id": 1,
                "display_name": "Squat",
                "set_count": 3,
                "repeat_count": 0,
                "repeat_unit": "C"
            }
        });
        assert!(serde_json::from_value::<EditCommand>(bad).is_err());

        let good = serde_json::to_value(EditCommand::AddEntry {
            target: RowTarget::Row(2),
            entry: entry("Squat", 3),
        })
        .unwrap();
        let parsed: EditCommand = serde_json::from_value(good).unwrap();
        assert!(matches!(parsed, EditCommand::AddEntry { target: RowTarget::Row(2), .. }));
    }
}
