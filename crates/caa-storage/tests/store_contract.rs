//! Behaviour shared by every StudioStore backend. Each check runs against
//! both the in-memory and the SQLite store.

use caa_core::id::{ExerciseId, PersonId, ProgramId};
use caa_core::records::{BodyMeasurements, ExerciseDraft, PersonDraft, ProgramDraft};
use caa_core::selection::{ExerciseSelectionList, RowTarget};
use caa_core::types::{ExerciseEntry, PersistedExerciseItem, RepeatUnit};
use caa_storage::{InMemoryStore, SqliteStore, StorageError, StudioStore};
use chrono::NaiveDate;

fn person(first: &str, mobile: &str) -> PersonDraft {
    PersonDraft {
        first_name: first.into(),
        last_name: "Rahimi".into(),
        mobile_number: mobile.into(),
        ..Default::default()
    }
}

fn exercise(name: &str, code: Option<&str>) -> ExerciseDraft {
    ExerciseDraft {
        name: name.into(),
        latin_name: String::new(),
        involved_muscle: "legs".into(),
        code: code.map(String::from),
    }
}

fn program(person_id: PersonId, name: &str, day: u32) -> ProgramDraft {
    ProgramDraft {
        person_id,
        name: name.into(),
        date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        description: None,
        measurements: BodyMeasurements {
            weight: 81.5,
            waist: 90,
            ..Default::default()
        },
    }
}

fn item(group: u32, exercise_id: ExerciseId, sets: u32) -> PersistedExerciseItem {
    PersistedExerciseItem {
        id: group,
        exercise_id,
        exercise_name: String::new(),
        exercise_set: sets,
        exercise_repeat: 10,
        exercise_repeat_type: RepeatUnit::Count,
    }
}

// ---------------------------------------------------------------------------
// Contract checks
// ---------------------------------------------------------------------------

fn person_crud<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let reza = store.create_person(&person("Reza", "0935")).unwrap();
    assert_ne!(ali.id, reza.id);

    assert_eq!(store.get_person(ali.id).unwrap(), ali);
    assert_eq!(store.list_persons().unwrap().len(), 2);

    let found = store.find_person_by_mobile("0935").unwrap().unwrap();
    assert_eq!(found.id, reza.id);
    assert!(store.find_person_by_mobile("0000").unwrap().is_none());

    let mut draft = person("Ali", "0999");
    draft.address = Some("Tehran".into());
    let updated = store.update_person(ali.id, &draft).unwrap();
    assert_eq!(store.get_person(ali.id).unwrap(), updated);

    store.delete_person(reza.id).unwrap();
    assert!(matches!(store.get_person(reza.id), Err(StorageError::PersonNotFound(_))));
    assert!(matches!(store.delete_person(reza.id), Err(StorageError::PersonNotFound(_))));
}

fn person_mobile_is_unique<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let reza = store.create_person(&person("Reza", "0935")).unwrap();

    assert!(matches!(
        store.create_person(&person("Other", "0912")),
        Err(StorageError::IntegrityError { .. })
    ));
    assert!(matches!(
        store.update_person(reza.id, &person("Reza", "0912")),
        Err(StorageError::IntegrityError { .. })
    ));
    // Keeping one's own number is fine.
    store.update_person(ali.id, &person("Ali", "0912")).unwrap();
}

fn person_search<S: StudioStore>(store: &mut S) {
    store.create_person(&person("Sara", "0912111")).unwrap();
    store.create_person(&person("Mina", "0935222")).unwrap();

    let hits = store.search_persons("sAr").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].first_name, "Sara");

    assert_eq!(store.search_persons("rahimi").unwrap().len(), 2);
    assert_eq!(store.search_persons("222").unwrap().len(), 1);
    assert!(store.search_persons("%").unwrap().is_empty());
}

fn exercise_crud_and_uniqueness<S: StudioStore>(store: &mut S) {
    let squat = store.create_exercise(&exercise("Squat", Some("12"))).unwrap();
    let lunge = store.create_exercise(&exercise("Lunge", None)).unwrap();
    store.create_exercise(&exercise("Plank", None)).unwrap();

    assert_eq!(store.get_exercise(squat.id).unwrap(), squat);
    assert_eq!(store.find_exercise_by_code("12").unwrap().map(|e| e.id), Some(squat.id));
    assert_eq!(store.find_exercise_by_name("Lunge").unwrap().map(|e| e.id), Some(lunge.id));

    assert!(matches!(
        store.create_exercise(&exercise("Squat", None)),
        Err(StorageError::IntegrityError { .. })
    ));
    assert!(matches!(
        store.update_exercise(lunge.id, &exercise("Lunge", Some("12"))),
        Err(StorageError::IntegrityError { .. })
    ));

    let renamed = store.update_exercise(lunge.id, &exercise("Walking Lunge", Some("7"))).unwrap();
    assert_eq!(store.get_exercise(lunge.id).unwrap(), renamed);

    let names: Vec<String> = store
        .search_exercises("LUNGE")
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Walking Lunge"]);
    assert_eq!(store.search_exercises("").unwrap().len(), 3);
    assert_eq!(store.list_exercises().unwrap().len(), 3);
}

fn programs_by_person<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let late = store.create_program(&program(ali.id, "Cut", 20)).unwrap();
    let early = store.create_program(&program(ali.id, "Bulk", 3)).unwrap();

    let loaded = store.get_program(late.id).unwrap();
    assert_eq!(loaded, late);
    assert_eq!(loaded.measurements.waist, 90);

    let ids: Vec<ProgramId> = store
        .list_programs_for_person(ali.id)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![early.id, late.id]);

    let summaries = store.list_programs().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].person_name, "Ali Rahimi");

    assert!(matches!(
        store.create_program(&program(PersonId(999), "Ghost", 1)),
        Err(StorageError::PersonNotFound(999))
    ));
    assert!(matches!(
        store.delete_person(ali.id),
        Err(StorageError::InUse { entity: "person", .. })
    ));

    let mut draft = program(ali.id, "Cut v2", 21);
    draft.description = Some("lighter".into());
    let updated = store.update_program(late.id, &draft).unwrap();
    assert_eq!(store.get_program(late.id).unwrap(), updated);
}

fn items_round_trip<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let squat = store.create_exercise(&exercise("Squat", None)).unwrap();
    let lunge = store.create_exercise(&exercise("Lunge", None)).unwrap();
    let plan = store.create_program(&program(ali.id, "Legs", 1)).unwrap();

    assert!(store.load_items(plan.id).unwrap().is_empty());

    let mut list = ExerciseSelectionList::new();
    let entry = |id, name: &str, reps| ExerciseEntry::new(id, name, 3, reps, RepeatUnit::Count).unwrap();
    list.add_entry(RowTarget::New, entry(squat.id, "Squat", 10)).unwrap();
    list.add_entry(RowTarget::Row(1), entry(lunge.id, "Lunge", 12)).unwrap();
    list.add_entry(RowTarget::New, entry(squat.id, "Squat", 8)).unwrap();

    store.save_items(plan.id, &list.flatten()).unwrap();
    let loaded = store.load_items(plan.id).unwrap();
    assert_eq!(loaded, list.flatten());
    assert_eq!(ExerciseSelectionList::from_persisted(&loaded), list);

    // Saving replaces the whole plan.
    store.save_items(plan.id, &[item(1, lunge.id, 4)]).unwrap();
    let loaded = store.load_items(plan.id).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].exercise_name, "Lunge");
}

fn items_reference_real_exercises<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let squat = store.create_exercise(&exercise("Squat", None)).unwrap();
    let plan = store.create_program(&program(ali.id, "Legs", 1)).unwrap();
    store.save_items(plan.id, &[item(1, squat.id, 3)]).unwrap();

    let err = store
        .save_items(plan.id, &[item(1, squat.id, 3), item(2, ExerciseId(404), 3)])
        .unwrap_err();
    assert!(matches!(err, StorageError::ExerciseNotFound(404)));
    // The failed save kept the previous plan.
    assert_eq!(store.load_items(plan.id).unwrap().len(), 1);

    assert!(matches!(
        store.save_items(ProgramId(77), &[]),
        Err(StorageError::ProgramNotFound(77))
    ));
    assert!(matches!(
        store.delete_exercise(squat.id),
        Err(StorageError::InUse { entity: "exercise", .. })
    ));
}

fn delete_program_removes_items<S: StudioStore>(store: &mut S) {
    let ali = store.create_person(&person("Ali", "0912")).unwrap();
    let squat = store.create_exercise(&exercise("Squat", None)).unwrap();
    let plan = store.create_program(&program(ali.id, "Legs", 1)).unwrap();
    store.save_items(plan.id, &[item(1, squat.id, 3)]).unwrap();

    store.delete_program(plan.id).unwrap();
    assert!(matches!(store.get_program(plan.id), Err(StorageError::ProgramNotFound(_))));
    assert!(matches!(store.load_items(plan.id), Err(StorageError::ProgramNotFound(_))));

    // Nothing references the exercise or the person any more.
    store.delete_exercise(squat.id).unwrap();
    store.delete_person(ali.id).unwrap();
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

macro_rules! contract_tests {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            #[test]
            fn person_crud() {
                super::person_crud(&mut $make);
            }

            #[test]
            fn person_mobile_is_unique() {
                super::person_mobile_is_unique(&mut $make);
            }

            #[test]
            fn person_search() {
                super::person_search(&mut $make);
            }

            #[test]
            fn exercise_crud_and_uniqueness() {
                super::exercise_crud_and_uniqueness(&mut $make);
            }

            #[test]
            fn programs_by_person() {
                super::programs_by_person(&mut $make);
            }

            #[test]
            fn items_round_trip() {
                super::items_round_trip(&mut $make);
            }

            #[test]
            fn items_reference_real_exercises() {
                super::items_reference_real_exercises(&mut $make);
            }

            #[test]
            fn delete_program_removes_items() {
                super::delete_program_removes_items(&mut $make);
            }
        }
    };
}

contract_tests!(in_memory, InMemoryStore::new());
contract_tests!(sqlite, SqliteStore::in_memory().unwrap());
