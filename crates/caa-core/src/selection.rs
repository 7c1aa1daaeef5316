//! ExerciseSelectionList: the ordered, superset-aware exercise plan that a
//! program editor works on.
//!
//! A list is a sequence of [`Row`]s. Each row holds one or more
//! [`ExerciseEntry`] values; a row with several entries is a superset and all
//! of its entries share one set count. Row numbers are 1-based and dense:
//! after every mutation they are exactly `1..=len`.
//!
//! Every operation either applies completely or returns a
//! [`ValidationError`] and leaves the list as it was.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ValidationError;
use crate::labels::RepeatUnitLabels;
use crate::types::{ExerciseEntry, PersistedExerciseItem};

/// Entry storage for a row. Most rows hold one or two exercises.
pub type RowEntries = SmallVec<[ExerciseEntry; 2]>;

/// One line of a program plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    row_number: u32,
    entries: RowEntries,
}

impl Row {
    fn single(row_number: u32, entry: ExerciseEntry) -> Self {
        let mut entries = RowEntries::new();
        entries.push(entry);
        Row { row_number, entries }
    }

    /// 1-based position of this row in its list.
    pub fn row_number(&self) -> u32 {
        self.row_number
    }

    /// Entries in insertion order. Never empty.
    pub fn entries(&self) -> &[ExerciseEntry] {
        &self.entries
    }

    /// `true` when the row combines several exercises.
    pub fn is_superset(&self) -> bool {
        self.entries.len() > 1
    }

    /// The set count shared by the row's entries.
    pub fn set_count(&self) -> u32 {
        self.entries[0].set_count()
    }

    /// Formats the row as `" (<name> <sets> *<repeats> <unit>) "` per entry.
    pub fn label(&self, labels: &impl RepeatUnitLabels) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    " ({} {} *{} {}) ",
                    e.display_name(),
                    e.set_count(),
                    e.repeat_count(),
                    labels.label(e.repeat_unit())
                )
            })
            .collect()
    }
}

/// Where [`ExerciseSelectionList::add_entry`] should put an entry.
///
/// On the wire this is either the string `"new"` or a row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RowTargetRepr", into = "RowTargetRepr")]
pub enum RowTarget {
    /// Start a new row at the end of the list.
    New,
    /// Append to an existing row (or start a new one if past the end).
    Row(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RowTargetRepr {
    Number(u32),
    Word(String),
}

impl TryFrom<RowTargetRepr> for RowTarget {
    type Error = String;

    fn try_from(repr: RowTargetRepr) -> Result<Self, Self::Error> {
        match repr {
            RowTargetRepr::Number(n) => Ok(RowTarget::Row(n)),
            RowTargetRepr::Word(w) if w.eq_ignore_ascii_case("new") => Ok(RowTarget::New),
            RowTargetRepr::Word(w) => Err(format!("invalid row target '{}'", w)),
        }
    }
}

impl From<RowTarget> for RowTargetRepr {
    fn from(target: RowTarget) -> Self {
        match target {
            RowTarget::New => RowTargetRepr::Word("new".to_string()),
            RowTarget::Row(n) => RowTargetRepr::Number(n),
        }
    }
}

/// A display line for one row, paired with its row number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowLabel {
    pub row_number: u32,
    pub label: String,
}

/// The editable exercise plan of one program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseSelectionList {
    rows: Vec<Row>,
}

impl ExerciseSelectionList {
    /// Creates an empty list.
    pub fn new() -> Self {
        ExerciseSelectionList { rows: Vec::new() }
    }

    /// Rebuilds a list from stored items.
    ///
    /// Items sharing an `id` form one row. Rows follow the first-seen order of
    /// their ids and entries keep input order; rows are then numbered from 1.
    pub fn from_persisted(items: &[PersistedExerciseItem]) -> Self {
        let mut groups: IndexMap<u32, RowEntries> = IndexMap::new();
        for item in items {
            groups.entry(item.id).or_default().push(ExerciseEntry::from(item));
        }

        let mut list = ExerciseSelectionList {
            rows: groups
                .into_values()
                .map(|entries| Row { row_number: 0, entries })
                .collect(),
        };
        list.renumber();
        list
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row with the given 1-based number.
    pub fn row(&self, row_number: u32) -> Option<&Row> {
        let idx = (row_number as usize).checked_sub(1)?;
        self.rows.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of entries across all rows.
    pub fn entry_count(&self) -> usize {
        self.rows.iter().map(|r| r.entries.len()).sum()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Adds an entry, returning the number of the row it landed in.
    ///
    /// `New` and row numbers past the end start a new row. Appending to an
    /// existing row requires the entry's set count to match the row's.
    pub fn add_entry(&mut self, target: RowTarget, entry: ExerciseEntry) -> Result<u32, ValidationError> {
        let idx = match target {
            RowTarget::Row(0) => {
                return Err(ValidationError::RowOutOfRange { row: 0, len: self.rows.len() })
            }
            RowTarget::Row(n) if (n as usize) <= self.rows.len() => n as usize - 1,
            RowTarget::New | RowTarget::Row(_) => {
                let row_number = self.next_row_number();
                self.rows.push(Row::single(row_number, entry));
                return Ok(row_number);
            }
        };

        let row = &mut self.rows[idx];
        if row.set_count() != entry.set_count() {
            return Err(ValidationError::SetCountMismatch {
                row: row.row_number,
                expected: row.set_count(),
                actual: entry.set_count(),
            });
        }
        row.entries.push(entry);
        Ok(row.row_number)
    }

    /// Replaces the entry at `position` (0-based) of a row.
    ///
    /// In a superset the new set count must match the row's other entries.
    pub fn replace_entry(
        &mut self,
        row_number: u32,
        position: usize,
        entry: ExerciseEntry,
    ) -> Result<ExerciseEntry, ValidationError> {
        let idx = self.index_of(row_number)?;
        let row = &mut self.rows[idx];
        let len = row.entries.len();
        if position >= len {
            return Err(ValidationError::EntryOutOfRange { row: row_number, position, len });
        }

        let sibling = row
            .entries
            .iter()
            .enumerate()
            .find(|(i, _)| *i != position)
            .map(|(_, e)| e.set_count());
        if let Some(expected) = sibling {
            if expected != entry.set_count() {
                return Err(ValidationError::SetCountMismatch {
                    row: row_number,
                    expected,
                    actual: entry.set_count(),
                });
            }
        }

        Ok(std::mem::replace(&mut row.entries[position], entry))
    }

    /// Removes one entry from a row; the row goes too once it is empty.
    pub fn remove_entry(&mut self, row_number: u32, position: usize) -> Result<ExerciseEntry, ValidationError> {
        let idx = self.index_of(row_number)?;
        let len = self.rows[idx].entries.len();
        if position >= len {
            return Err(ValidationError::EntryOutOfRange { row: row_number, position, len });
        }

        if len == 1 {
            let mut row = self.rows.remove(idx);
            self.renumber();
            return Ok(row.entries.remove(0));
        }
        Ok(self.rows[idx].entries.remove(position))
    }

    /// Removes a whole row and closes the gap.
    pub fn remove_row(&mut self, row_number: u32) -> Result<Row, ValidationError> {
        let idx = self.index_of(row_number)?;
        let removed = self.rows.remove(idx);
        self.renumber();
        Ok(removed)
    }

    /// Swaps a row with the one above it. Returns `false` for the first row.
    pub fn move_row_up(&mut self, row_number: u32) -> Result<bool, ValidationError> {
        let idx = self.index_of(row_number)?;
        if idx == 0 {
            return Ok(false);
        }
        self.rows.swap(idx - 1, idx);
        self.renumber();
        Ok(true)
    }

    /// Swaps a row with the one below it. Returns `false` for the last row.
    pub fn move_row_down(&mut self, row_number: u32) -> Result<bool, ValidationError> {
        let idx = self.index_of(row_number)?;
        if idx + 1 == self.rows.len() {
            return Ok(false);
        }
        self.rows.swap(idx, idx + 1);
        self.renumber();
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    /// One display label per row, in row order.
    pub fn display_strings(&self, labels: &impl RepeatUnitLabels) -> Vec<RowLabel> {
        self.rows
            .iter()
            .map(|row| RowLabel {
                row_number: row.row_number,
                label: row.label(labels),
            })
            .collect()
    }

    /// Flattens the list back to stored items, row by row and entry by entry.
    /// Each item's `id` is its row's current number.
    pub fn flatten(&self) -> Vec<PersistedExerciseItem> {
        self.rows
            .iter()
            .flat_map(|row| row.entries.iter().map(move |e| e.to_persisted(row.row_number)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, row_number: u32) -> Result<usize, ValidationError> {
        if row_number == 0 || row_number as usize > self.rows.len() {
            return Err(ValidationError::RowOutOfRange {
                row: row_number,
                len: self.rows.len(),
            });
        }
        Ok(row_number as usize - 1)
    }

    fn next_row_number(&self) -> u32 {
        self.rows.len() as u32 + 1
    }

    fn renumber(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.row_number = i as u32 + 1;
        }

        #[cfg(debug_assertions)]
        self.assert_dense();
    }

    #[cfg(debug_assertions)]
    fn assert_dense(&self) {
        for (i, row) in self.rows.iter().enumerate() {
            debug_assert_eq!(row.row_number as usize, i + 1, "row numbers must be dense");
            debug_assert!(!row.entries.is_empty(), "rows must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ExerciseId;
    use crate::labels::StaticLabels;
    use crate::types::RepeatUnit;

    fn entry(id: i64, name: &str, sets: u32, reps: u32) -> ExerciseEntry {
        ExerciseEntry::new(ExerciseId(id), name, sets, reps, RepeatUnit::Count).unwrap()
    }

    fn numbers(list: &ExerciseSelectionList) -> Vec<u32> {
        list.rows().iter().map(|r| r.row_number()).collect()
    }

    fn first_names(list: &ExerciseSelectionList) -> Vec<String> {
        list.rows()
            .iter()
            .map(|r| r.entries()[0].display_name().to_string())
            .collect()
    }

    fn four_rows() -> ExerciseSelectionList {
        let mut list = ExerciseSelectionList::new();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            list.add_entry(RowTarget::New, entry(i as i64 + 1, name, 3, 10)).unwrap();
        }
        list
    }

    #[test]
    fn squat_lunge_superset_end_to_end() {
        let mut list = ExerciseSelectionList::new();
        let row = list.add_entry(RowTarget::New, entry(5, "Squat", 3, 10)).unwrap();
        assert_eq!(row, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.rows()[0].entries().len(), 1);

        let row = list.add_entry(RowTarget::Row(1), entry(7, "Lunge", 3, 12)).unwrap();
        assert_eq!(row, 1);
        assert!(list.rows()[0].is_superset());

        let labels = list.display_strings(&StaticLabels::english());
        assert_eq!(
            labels,
            vec![RowLabel {
                row_number: 1,
                label: " (Squat 3 *10 reps)  (Lunge 3 *12 reps) ".to_string(),
            }]
        );
    }

    #[test]
    fn set_count_mismatch_leaves_row_unchanged() {
        let mut list = ExerciseSelectionList::new();
        list.add_entry(RowTarget::New, entry(1, "Press", 3, 8)).unwrap();
        let before = list.clone();

        let err = list.add_entry(RowTarget::Row(1), entry(2, "Fly", 4, 8)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SetCountMismatch { row: 1, expected: 3, actual: 4 }
        );
        assert_eq!(list, before);
    }

    #[test]
    fn row_past_the_end_starts_a_new_row() {
        let mut list = ExerciseSelectionList::new();
        list.add_entry(RowTarget::New, entry(1, "A", 3, 10)).unwrap();
        let row = list.add_entry(RowTarget::Row(9), entry(2, "B", 4, 10)).unwrap();
        assert_eq!(row, 2);
        assert_eq!(numbers(&list), vec![1, 2]);
    }

    #[test]
    fn row_zero_is_out_of_range() {
        let mut list = ExerciseSelectionList::new();
        let err = list.add_entry(RowTarget::Row(0), entry(1, "A", 3, 10)).unwrap_err();
        assert_eq!(err, ValidationError::RowOutOfRange { row: 0, len: 0 });
        assert!(list.is_empty());
    }

    #[test]
    fn removing_row_two_of_four_shifts_the_rest() {
        let mut list = four_rows();
        let removed = list.remove_row(2).unwrap();
        assert_eq!(removed.entries()[0].display_name(), "B");
        assert_eq!(numbers(&list), vec![1, 2, 3]);
        assert_eq!(first_names(&list), vec!["A", "C", "D"]);
    }

    #[test]
    fn remove_row_out_of_range() {
        let mut list = four_rows();
        assert!(matches!(
            list.remove_row(5),
            Err(ValidationError::RowOutOfRange { row: 5, len: 4 })
        ));
        assert!(list.remove_row(0).is_err());
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn moves_at_the_boundaries_are_no_ops() {
        let mut list = four_rows();
        let before = list.clone();
        assert!(!list.move_row_up(1).unwrap());
        assert!(!list.move_row_down(4).unwrap());
        assert_eq!(list, before);
    }

    #[test]
    fn moves_swap_adjacent_rows_only() {
        let mut list = four_rows();
        assert!(list.move_row_up(3).unwrap());
        assert_eq!(first_names(&list), vec!["A", "C", "B", "D"]);
        assert!(list.move_row_down(1).unwrap());
        assert_eq!(first_names(&list), vec!["C", "A", "B", "D"]);
        assert_eq!(numbers(&list), vec![1, 2, 3, 4]);
    }

    #[test]
    fn moving_a_missing_row_is_an_error() {
        let mut list = four_rows();
        assert!(list.move_row_up(7).is_err());
        assert!(list.move_row_down(0).is_err());
    }

    #[test]
    fn from_persisted_groups_by_first_seen_id() {
        let items = vec![
            entry(1, "A", 3, 10).to_persisted(7),
            entry(2, "B", 4, 10).to_persisted(2),
            entry(3, "C", 3, 12).to_persisted(7),
            entry(4, "D", 5, 5).to_persisted(9),
        ];
        let list = ExerciseSelectionList::from_persisted(&items);

        assert_eq!(numbers(&list), vec![1, 2, 3]);
        let names: Vec<Vec<&str>> = list
            .rows()
            .iter()
            .map(|r| r.entries().iter().map(|e| e.display_name()).collect())
            .collect();
        assert_eq!(names, vec![vec!["A", "C"], vec!["B"], vec!["D"]]);
    }

    #[test]
    fn from_persisted_empty_is_empty() {
        assert!(ExerciseSelectionList::from_persisted(&[]).is_empty());
    }

    #[test]
    fn flatten_uses_final_row_numbers() {
        let mut list = four_rows();
        list.add_entry(RowTarget::Row(4), entry(9, "E", 3, 6)).unwrap();
        list.remove_row(1).unwrap();

        let groups: Vec<(u32, String)> = list
            .flatten()
            .into_iter()
            .map(|i| (i.id, i.exercise_name))
            .collect();
        assert_eq!(
            groups,
            vec![
                (1, "B".to_string()),
                (2, "C".to_string()),
                (3, "D".to_string()),
                (3, "E".to_string()),
            ]
        );
    }

    #[test]
    fn replace_entry_checks_siblings_only() {
        let mut list = ExerciseSelectionList::new();
        list.add_entry(RowTarget::New, entry(1, "Solo", 3, 10)).unwrap();
        // A single-entry row may change its set count freely.
        list.replace_entry(1, 0, entry(2, "Solo2", 5, 10)).unwrap();
        assert_eq!(list.rows()[0].set_count(), 5);

        list.add_entry(RowTarget::Row(1), entry(3, "Pair", 5, 8)).unwrap();
        let before = list.clone();
        let err = list.replace_entry(1, 1, entry(4, "Bad", 4, 8)).unwrap_err();
        assert!(matches!(err, ValidationError::SetCountMismatch { expected: 5, actual: 4, .. }));
        assert_eq!(list, before);

        let old = list.replace_entry(1, 1, entry(4, "Good", 5, 9)).unwrap();
        assert_eq!(old.display_name(), "Pair");
    }

    #[test]
    fn replace_entry_position_out_of_range() {
        let mut list = four_rows();
        let err = list.replace_entry(2, 3, entry(1, "X", 3, 10)).unwrap_err();
        assert_eq!(err, ValidationError::EntryOutOfRange { row: 2, position: 3, len: 1 });
    }

    #[test]
    fn removing_last_entry_removes_row() {
        let mut list = four_rows();
        list.add_entry(RowTarget::Row(2), entry(8, "B2", 3, 10)).unwrap();

        list.remove_entry(2, 0).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.rows()[1].entries()[0].display_name(), "B2");

        list.remove_entry(2, 0).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(first_names(&list), vec!["A", "C", "D"]);
        assert_eq!(numbers(&list), vec![1, 2, 3]);
    }

    #[test]
    fn row_target_wire_format() {
        let t: RowTarget = serde_json::from_str("\"new\"").unwrap();
        assert_eq!(t, RowTarget::New);
        let t: RowTarget = serde_json::from_str("3").unwrap();
        assert_eq!(t, RowTarget::Row(3));
        assert!(serde_json::from_str::<RowTarget>("\"last\"").is_err());
        assert_eq!(serde_json::to_string(&RowTarget::New).unwrap(), "\"new\"");
    }
}
