//! Exercise lookup used while editing a plan.

use serde::{Deserialize, Serialize};

use crate::id::ExerciseId;
use crate::records::Exercise;

/// One search hit: enough to build an entry or show a picker row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub id: ExerciseId,
    pub display_name: String,
}

impl From<&Exercise> for CatalogMatch {
    fn from(exercise: &Exercise) -> Self {
        CatalogMatch {
            id: exercise.id,
            display_name: exercise.name.clone(),
        }
    }
}

/// Something that can find exercises by name and resolve them by id.
pub trait ExerciseCatalog {
    /// Case-insensitive substring search on the exercise name. A blank query
    /// matches everything.
    fn search(&self, query: &str) -> Vec<CatalogMatch>;

    fn resolve(&self, id: ExerciseId) -> Option<CatalogMatch>;
}

impl ExerciseCatalog for [Exercise] {
    fn search(&self, query: &str) -> Vec<CatalogMatch> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .map(CatalogMatch::from)
            .collect()
    }

    fn resolve(&self, id: ExerciseId) -> Option<CatalogMatch> {
        self.iter().find(|e| e.id == id).map(CatalogMatch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Exercise> {
        ["Back Squat", "Front Squat", "Lunge"]
            .iter()
            .enumerate()
            .map(|(i, name)| Exercise {
                id: ExerciseId(i as i64 + 1),
                name: name.to_string(),
                latin_name: String::new(),
                involved_muscle: String::new(),
                code: None,
            })
            .collect()
    }

    #[test]
    fn search_ignores_case() {
        let exercises = catalog();
        let hits = exercises.as_slice().search("SQUAT");
        let names: Vec<_> = hits.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["Back Squat", "Front Squat"]);
    }

    #[test]
    fn blank_query_lists_everything() {
        assert_eq!(catalog().as_slice().search("  ").len(), 3);
    }

    #[test]
    fn resolve_by_id() {
        let exercises = catalog();
        assert_eq!(
            exercises.as_slice().resolve(ExerciseId(3)).map(|m| m.display_name),
            Some("Lunge".to_string())
        );
        assert!(exercises.as_slice().resolve(ExerciseId(9)).is_none());
    }
}
