pub mod id;
pub mod error;
pub mod types;
pub mod selection;
pub mod labels;
pub mod command;
pub mod input;
pub mod records;
pub mod catalog;
pub mod report;

// Re-export commonly used types
pub use id::{ExerciseId, PersonId, ProgramId};
pub use error::ValidationError;
pub use types::{ExerciseEntry, PersistedExerciseItem, RepeatUnit};
pub use selection::{ExerciseSelectionList, Row, RowLabel, RowTarget};
pub use labels::{RepeatUnitLabels, StaticLabels};
pub use command::{BatchError, EditCommand};
pub use records::{BodyMeasurements, Exercise, ExerciseDraft, Person, PersonDraft, Program, ProgramDraft};
pub use catalog::{CatalogMatch, ExerciseCatalog};
pub use report::{MeasurementRow, ProgramSheet, SheetHeader, SheetLine};
