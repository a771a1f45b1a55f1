use std::sync::Arc;

use super::prompt::build_recommendation_message;
use super::schema::recommendation_schema;
use super::types::{GeneratedRecommendation, RecommendationOutput};
use crate::models::PatientProfile;
use crate::pipeline::biomechanics::{format_targets_for_prompt, identify_targets};
use crate::pipeline::generation::StructuredGenerator;
use crate::pipeline::prompt_templates::PromptTemplates;
use crate::pipeline::validation::{
    check_array_len, check_difficulty, check_exercise_id, decode, generate_value, EXERCISE_COUNT,
    POSITION_COUNT,
};
use crate::pipeline::{Stage, StageError};

const STAGE: Stage = Stage::Recommendation;

/// Drives the recommendation call: targets → instruction → generate → validate.
///
/// Performs exactly one generation call per `recommend`; retrying is the
/// caller's decision.
pub struct ExerciseRecommender {
    generator: Arc<dyn StructuredGenerator + Send + Sync>,
    templates: Arc<PromptTemplates>,
}

impl ExerciseRecommender {
    pub fn new(
        generator: Arc<dyn StructuredGenerator + Send + Sync>,
        templates: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            generator,
            templates,
        }
    }

    pub fn recommend(&self, profile: &PatientProfile) -> Result<RecommendationOutput, StageError> {
        let _span = tracing::info_span!("recommend", catalog_size = profile.exercises.len())
            .entered();

        let targets = identify_targets(profile);
        let system = self
            .templates
            .recommendation_instruction(&format_targets_for_prompt(&targets));
        let user = build_recommendation_message(profile)
            .map_err(|source| StageError::PromptEncoding { stage: STAGE, source })?;

        let value = generate_value(
            self.generator.as_ref(),
            STAGE,
            &system,
            &user,
            &recommendation_schema(),
        )?;

        check_array_len(STAGE, &value, &["selected_exercises"], EXERCISE_COUNT)?;
        check_array_len(
            STAGE,
            &value,
            &["patient_assessment", "recommended_positions"],
            POSITION_COUNT,
        )?;
        let generated: GeneratedRecommendation = decode(STAGE, value)?;
        validate_recommendation(&generated, profile)?;

        tracing::info!(
            targets = targets.len(),
            exercise_ids = ?generated
                .selected_exercises
                .iter()
                .map(|e| e.exercise_id)
                .collect::<Vec<_>>(),
            "Recommendation validated"
        );

        Ok(generated.with_targets(targets))
    }
}

/// Catalog and range checks on a decoded recommendation.
pub fn validate_recommendation(
    generated: &GeneratedRecommendation,
    profile: &PatientProfile,
) -> Result<(), StageError> {
    for (i, exercise) in generated.selected_exercises.iter().enumerate() {
        check_exercise_id(
            STAGE,
            format!("selected_exercises[{i}].exercise_id"),
            exercise.exercise_id,
            &profile.exercises,
        )?;
        check_difficulty(
            STAGE,
            format!("selected_exercises[{i}].difficulty"),
            exercise.difficulty,
        )?;
    }
    Ok(())
}
