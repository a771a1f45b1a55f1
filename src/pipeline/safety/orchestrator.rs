use std::sync::Arc;

use super::prompt::build_verification_message;
use super::schema::verification_schema;
use super::types::SafetyVerificationOutput;
use crate::models::PatientProfile;
use crate::pipeline::generation::StructuredGenerator;
use crate::pipeline::prompt_templates::PromptTemplates;
use crate::pipeline::recommendation::RecommendationOutput;
use crate::pipeline::validation::{
    check_array_len, check_difficulty, check_exercise_id, decode, generate_value, EXERCISE_COUNT,
};
use crate::pipeline::{Stage, StageError};

const STAGE: Stage = Stage::Verification;

/// Drives the safety review call over a validated recommendation.
///
/// Does not enforce that rejected exercises are left out of the final
/// prescription; see `check_decision_consistency` for that.
pub struct SafetyVerifier {
    generator: Arc<dyn StructuredGenerator + Send + Sync>,
    templates: Arc<PromptTemplates>,
}

impl SafetyVerifier {
    pub fn new(
        generator: Arc<dyn StructuredGenerator + Send + Sync>,
        templates: Arc<PromptTemplates>,
    ) -> Self {
        Self {
            generator,
            templates,
        }
    }

    pub fn verify(
        &self,
        profile: &PatientProfile,
        recommendation: &RecommendationOutput,
    ) -> Result<SafetyVerificationOutput, StageError> {
        let _span = tracing::info_span!(
            "verify",
            proposed = recommendation.selected_exercises.len()
        )
        .entered();

        let user = build_verification_message(profile, &recommendation.selected_exercises)
            .map_err(|source| StageError::PromptEncoding { stage: STAGE, source })?;

        let value = generate_value(
            self.generator.as_ref(),
            STAGE,
            self.templates.verification_instruction(),
            &user,
            &verification_schema(),
        )?;

        check_array_len(STAGE, &value, &["final_prescription"], EXERCISE_COUNT)?;
        let output: SafetyVerificationOutput = decode(STAGE, value)?;
        validate_verification(&output, profile)?;

        let rejected = output
            .exercise_decisions
            .iter()
            .filter(|d| d.is_rejected())
            .count();
        tracing::info!(
            weight_bearing = %output.safety_review.weight_bearing_check.verdict,
            kneeling = %output.safety_review.kneeling_check.verdict,
            core_stability = %output.safety_review.core_stability_check.verdict,
            decisions = output.exercise_decisions.len(),
            rejected,
            "Safety verification validated"
        );

        Ok(output)
    }
}

/// Catalog and range checks on a decoded verification.
pub fn validate_verification(
    output: &SafetyVerificationOutput,
    profile: &PatientProfile,
) -> Result<(), StageError> {
    for (i, decision) in output.exercise_decisions.iter().enumerate() {
        check_exercise_id(
            STAGE,
            format!("exercise_decisions[{i}].exercise_id"),
            decision.exercise_id,
            &profile.exercises,
        )?;
    }
    for (i, exercise) in output.final_prescription.iter().enumerate() {
        check_exercise_id(
            STAGE,
            format!("final_prescription[{i}].exercise_id"),
            exercise.exercise_id,
            &profile.exercises,
        )?;
        check_difficulty(
            STAGE,
            format!("final_prescription[{i}].difficulty"),
            exercise.difficulty,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::ExerciseDecisionKind;
    use crate::pipeline::biomechanics::identify_targets;
    use crate::pipeline::generation::MockGenerator;
    use crate::pipeline::recommendation::GeneratedRecommendation;
    use crate::pipeline::test_support::{recommendation_json, sample_profile, verification_json};
    use serde_json::Value;

    fn recommendation() -> RecommendationOutput {
        let generated: GeneratedRecommendation =
            serde_json::from_value(recommendation_json()).unwrap();
        generated.with_targets(identify_targets(&sample_profile()))
    }

    fn verifier(generator: Arc<MockGenerator>) -> SafetyVerifier {
        SafetyVerifier::new(generator, Arc::new(PromptTemplates::builtin()))
    }

    fn run_with(value: Value) -> Result<SafetyVerificationOutput, StageError> {
        verifier(Arc::new(MockGenerator::returning(value)))
            .verify(&sample_profile(), &recommendation())
    }

    #[test]
    fn valid_response_passes() {
        let output = run_with(verification_json()).unwrap();
        assert_eq!(output.final_prescription.len(), 4);
        assert_eq!(
            output.exercise_decisions[2].decision,
            ExerciseDecisionKind::ApprovedWithModifications
        );
    }

    #[test]
    fn uses_fixed_instruction_and_selected_exercises() {
        let mock = Arc::new(MockGenerator::returning(verification_json()));
        verifier(mock.clone())
            .verify(&sample_profile(), &recommendation())
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].system,
            PromptTemplates::builtin().verification_instruction()
        );
        assert!(calls[0].user.contains("PROPOSED EXERCISES:"));
        assert!(!calls[0].user.contains("Dynamic knee instability"));
        assert_eq!(calls[0].schema_name, "safety_verification");
    }

    #[test]
    fn short_prescription_is_cardinality_error() {
        let mut value = verification_json();
        if let Some(list) = value["final_prescription"].as_array_mut() {
            list.truncate(2);
        }
        let err = run_with(value).unwrap_err();
        match err {
            StageError::Cardinality { stage, field, expected, actual } => {
                assert_eq!(stage, Stage::Verification);
                assert_eq!(field, "final_prescription");
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_response_is_empty() {
        let err = verifier(Arc::new(MockGenerator::null()))
            .verify(&sample_profile(), &recommendation())
            .unwrap_err();
        assert!(matches!(err, StageError::EmptyResponse { stage: Stage::Verification }));
    }

    #[test]
    fn invented_replacement_id_rejected() {
        let mut value = verification_json();
        value["final_prescription"][3]["exercise_id"] = 4242.into();
        let err = run_with(value).unwrap_err();
        assert!(matches!(
            err,
            StageError::UnknownExercise { exercise_id: 4242, ref field, .. }
                if field == "final_prescription[3].exercise_id"
        ));
    }

    #[test]
    fn unknown_decision_id_rejected() {
        let mut value = verification_json();
        value["exercise_decisions"][0]["exercise_id"] = 1.into();
        let err = run_with(value).unwrap_err();
        assert!(matches!(err, StageError::UnknownExercise { exercise_id: 1, .. }));
    }

    #[test]
    fn prescription_difficulty_checked() {
        let mut value = verification_json();
        value["final_prescription"][0]["difficulty"] = 0.into();
        let err = run_with(value).unwrap_err();
        assert!(matches!(err, StageError::OutOfRange { value: 0, .. }));
    }

    #[test]
    fn invalid_verdict_is_schema_violation() {
        let mut value = verification_json();
        value["safety_review"]["kneeling_check"]["verdict"] = "dangerous".into();
        let err = run_with(value).unwrap_err();
        assert!(matches!(err, StageError::SchemaViolation { stage: Stage::Verification, .. }));
    }
}
