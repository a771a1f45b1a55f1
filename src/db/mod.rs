pub mod catalog;
pub mod memory;
pub mod repository;
pub mod sqlite;

pub use catalog::*;
pub use memory::*;
pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

use crate::models::{ExerciseRecord, RawDemographics, RawQuestionnaire, RawStsAssessment};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid stored value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

/// Keyed lookup over the persisted assessment records and exercise catalog.
///
/// Per-patient lookups return `Ok(None)` when the record is absent; deciding
/// whether absence is fatal belongs to the caller.
pub trait PatientRecordSource {
    fn demographics(&self, patient_id: &str) -> Result<Option<RawDemographics>, DatabaseError>;

    fn questionnaire(&self, patient_id: &str) -> Result<Option<RawQuestionnaire>, DatabaseError>;

    fn sts_assessment(&self, patient_id: &str) -> Result<Option<RawStsAssessment>, DatabaseError>;

    /// Full catalog in stable id order.
    fn exercise_catalog(&self) -> Result<Vec<ExerciseRecord>, DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_source_is_object_safe() {
        fn _assert_source(_: &dyn PatientRecordSource) {}
    }
}
