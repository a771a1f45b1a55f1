//! End-to-end prescription run.
//!
//! Drives profile → recommendation → verification → consistency report for
//! one patient. Generation and record access are injected, so the whole run
//! is testable with in-memory sources and stub generators.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{ConfigError, PipelineConfig};
use crate::db::{DatabaseError, PatientRecordSource};
use crate::models::PatientProfile;
use crate::pipeline::generation::{LlmError, OllamaClient, StructuredGenerator};
use crate::pipeline::profile::{build_for_patient, ProfileError};
use crate::pipeline::prompt_templates::{PromptTemplates, TemplateError};
use crate::pipeline::recommendation::{ExerciseRecommender, RecommendationOutput};
use crate::pipeline::safety::{
    check_decision_consistency, ConsistencyReport, SafetyVerificationOutput, SafetyVerifier,
};
use crate::pipeline::{Stage, StageError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Prompt template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Generation service error: {0}")]
    Llm(#[from] LlmError),

    #[error("Stage failed after {attempts} attempt(s): {source}")]
    Stage {
        attempts: usize,
        #[source]
        source: StageError,
    },
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PrescriptionOutcome {
    pub run_id: Uuid,
    pub profile: PatientProfile,
    pub recommendation: RecommendationOutput,
    pub verification: SafetyVerificationOutput,
    pub consistency: ConsistencyReport,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct PrescriptionPipeline {
    recommender: ExerciseRecommender,
    verifier: SafetyVerifier,
    stage_attempts: usize,
}

impl PrescriptionPipeline {
    /// `stage_attempts` is how many times each stage may be invoked; values
    /// below 1 are treated as 1.
    pub fn new(
        generator: Arc<dyn StructuredGenerator + Send + Sync>,
        templates: Arc<PromptTemplates>,
        stage_attempts: usize,
    ) -> Self {
        Self {
            recommender: ExerciseRecommender::new(generator.clone(), templates.clone()),
            verifier: SafetyVerifier::new(generator, templates),
            stage_attempts: stage_attempts.max(1),
        }
    }

    /// Ollama-backed pipeline with templates from the configured directory
    /// (or the built-ins). Checks the model is pulled before returning.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let client = OllamaClient::from_config(config)?;
        client.ensure_model_available()?;
        let templates = PromptTemplates::load(config.prompts_dir.as_deref())?;
        Ok(Self::new(
            Arc::new(client),
            Arc::new(templates),
            config.stage_attempts,
        ))
    }

    pub fn run(
        &self,
        source: &dyn PatientRecordSource,
        patient_id: &str,
        today: NaiveDate,
    ) -> Result<PrescriptionOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let _span = tracing::info_span!("prescription_run", run_id = %run_id).entered();

        let profile = build_for_patient(source, patient_id, today)?;

        let recommendation = self.with_attempts(Stage::Recommendation, || {
            self.recommender.recommend(&profile)
        })?;
        let verification = self.with_attempts(Stage::Verification, || {
            self.verifier.verify(&profile, &recommendation)
        })?;
        let consistency = check_decision_consistency(&recommendation, &verification);

        tracing::info!(
            consistent = consistency.is_consistent(),
            "Prescription run complete"
        );

        Ok(PrescriptionOutcome {
            run_id,
            profile,
            recommendation,
            verification,
            consistency,
        })
    }

    /// Re-invoke a stage from scratch on retryable failures.
    fn with_attempts<T>(
        &self,
        stage: Stage,
        mut invoke: impl FnMut() -> Result<T, StageError>,
    ) -> Result<T, PipelineError> {
        let mut attempt = 1;
        loop {
            match invoke() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.stage_attempts => {
                    tracing::warn!(
                        stage = %stage,
                        attempt,
                        error = %e,
                        "Stage failed, retrying"
                    );
                    attempt += 1;
                }
                Err(source) => {
                    return Err(PipelineError::Stage {
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}
