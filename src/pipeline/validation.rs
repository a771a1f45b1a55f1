//! Validation gates shared by the two generation stages.
//!
//! A stage response passes, in order: non-null, list cardinality on the raw
//! value, typed decode, then catalog and range checks on the typed value.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::generation::{OutputSchema, StructuredGenerator};
use super::{Stage, StageError};
use crate::models::{find_exercise, ExerciseRecord};

/// Exercises in `selected_exercises` and in `final_prescription`.
pub const EXERCISE_COUNT: usize = 4;

/// Entries in `patient_assessment.recommended_positions`.
pub const POSITION_COUNT: usize = 2;

pub const DIFFICULTY_MIN: i64 = 1;
pub const DIFFICULTY_MAX: i64 = 10;

/// Invoke the generator once, mapping service failure and null output.
pub fn generate_value(
    generator: &dyn StructuredGenerator,
    stage: Stage,
    system: &str,
    user: &str,
    schema: &OutputSchema,
) -> Result<Value, StageError> {
    generator
        .generate(system, user, schema)
        .map_err(|source| StageError::Generation { stage, source })?
        .ok_or(StageError::EmptyResponse { stage })
}

/// Exact length of the array reached by following `path` through nested objects.
pub fn check_array_len(
    stage: Stage,
    value: &Value,
    path: &[&str],
    expected: usize,
) -> Result<(), StageError> {
    let field = path.join(".");
    let node = path.iter().try_fold(value, |node, key| node.get(key));
    let Some(items) = node.and_then(Value::as_array) else {
        return Err(StageError::SchemaViolation {
            stage,
            reason: format!("{field} is missing or not an array"),
        });
    };
    check_count(stage, &field, expected, items.len())
}

pub fn check_count(
    stage: Stage,
    field: &str,
    expected: usize,
    actual: usize,
) -> Result<(), StageError> {
    if actual == expected {
        Ok(())
    } else {
        Err(StageError::Cardinality {
            stage,
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

/// Decode the raw value into the stage's typed contract.
pub fn decode<T: DeserializeOwned>(stage: Stage, value: Value) -> Result<T, StageError> {
    serde_json::from_value(value).map_err(|e| StageError::SchemaViolation {
        stage,
        reason: e.to_string(),
    })
}

pub fn check_exercise_id(
    stage: Stage,
    field: String,
    exercise_id: i64,
    catalog: &[ExerciseRecord],
) -> Result<(), StageError> {
    match find_exercise(catalog, exercise_id) {
        Some(_) => Ok(()),
        None => Err(StageError::UnknownExercise {
            stage,
            field,
            exercise_id,
        }),
    }
}

pub fn check_difficulty(stage: Stage, field: String, value: i64) -> Result<(), StageError> {
    if (DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&value) {
        Ok(())
    } else {
        Err(StageError::OutOfRange {
            stage,
            field,
            value,
            min: DIFFICULTY_MIN,
            max: DIFFICULTY_MAX,
        })
    }
}
