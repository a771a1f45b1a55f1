pub mod biomechanics;
pub mod generation;
pub mod processor;
pub mod profile;
pub mod prompt_templates;
pub mod recommendation;
pub mod safety;
pub mod scoring;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use generation::LlmError;

/// The two generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Recommendation,
    Verification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recommendation => write!(f, "recommendation"),
            Self::Verification => write!(f, "verification"),
        }
    }
}

/// Failures of a single generation stage. Every variant names its stage.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("{stage}: generation service returned no value")]
    EmptyResponse { stage: Stage },

    #[error("{stage}: {field} has {actual} entries, expected exactly {expected}")]
    Cardinality {
        stage: Stage,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("{stage}: {field} references exercise {exercise_id}, which is not in the catalog")]
    UnknownExercise {
        stage: Stage,
        field: String,
        exercise_id: i64,
    },

    #[error("{stage}: {field} = {value} is outside {min}..={max}")]
    OutOfRange {
        stage: Stage,
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{stage}: response does not match the output schema: {reason}")]
    SchemaViolation { stage: Stage, reason: String },

    #[error("{stage}: cannot encode prompt data: {source}")]
    PromptEncoding {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stage}: generation failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: LlmError,
    },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::EmptyResponse { stage }
            | Self::Cardinality { stage, .. }
            | Self::UnknownExercise { stage, .. }
            | Self::OutOfRange { stage, .. }
            | Self::SchemaViolation { stage, .. }
            | Self::PromptEncoding { stage, .. }
            | Self::Generation { stage, .. } => *stage,
        }
    }

    /// Whether re-invoking the stage from scratch may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EmptyResponse { .. }
            | Self::Cardinality { .. }
            | Self::SchemaViolation { .. } => true,
            Self::Generation { source, .. } => source.is_transient(),
            Self::UnknownExercise { .. }
            | Self::OutOfRange { .. }
            | Self::PromptEncoding { .. } => false,
        }
    }
}
