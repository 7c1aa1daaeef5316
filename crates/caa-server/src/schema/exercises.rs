//! Exercise catalog request/response types.

use serde::Serialize;

use caa_core::catalog::CatalogMatch;
use caa_core::records::Exercise;

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<Exercise>,
}

/// Picker results for the plan editor.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSearchResponse {
    pub matches: Vec<CatalogMatch>,
}
