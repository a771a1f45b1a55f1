use serde::{Deserialize, Serialize};

use crate::pipeline::biomechanics::BiomechanicalTarget;

/// Validated recommendation with the rule engine's targets attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutput {
    pub patient_assessment: PatientAssessment,
    pub selected_exercises: Vec<SelectedExercise>,
    /// Copied from the rule engine, never produced by generation.
    pub biomechanical_targets: Vec<BiomechanicalTarget>,
}

/// Shape the generation service fills in; targets are attached afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecommendation {
    pub patient_assessment: PatientAssessment,
    pub selected_exercises: Vec<SelectedExercise>,
}

impl GeneratedRecommendation {
    pub fn with_targets(self, targets: Vec<BiomechanicalTarget>) -> RecommendationOutput {
        RecommendationOutput {
            patient_assessment: self.patient_assessment,
            selected_exercises: self.selected_exercises,
            biomechanical_targets: targets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAssessment {
    pub capability_summary: String,
    pub recommended_positions: Vec<String>,
    /// e.g. `"1-3"`
    pub difficulty_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub exercise_name_ch: String,
    pub positions: Vec<String>,
    pub difficulty: i64,
    pub muscle_targets: MuscleTargets,
    pub reasoning: String,
}

/// Muscle recruitment as `"muscle:value"` strings, e.g. `"quad:5"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuscleTargets {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub stabiliser: Vec<String>,
}
