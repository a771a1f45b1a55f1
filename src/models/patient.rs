use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{
    BenchmarkPerformance, Gender, KneeAlignment, QuestionnaireSection, SwayStatus, ToeTouch,
};
use super::exercise::ExerciseRecord;

/// Canonical, immutable view of one patient, built once per pipeline run.
///
/// Serialised as-is into both generation prompts, so field names double as
/// the vocabulary the prompt templates refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub demographics: Demographics,
    pub questionnaire_sections: BTreeMap<QuestionnaireSection, SectionScore>,
    pub position_relevant_questions: PositionQuestions,
    pub flexibility: Flexibility,
    pub sts_assessment: StsAssessment,
    pub exercises: Vec<ExerciseRecord>,
}

impl PatientProfile {
    pub fn section(&self, section: QuestionnaireSection) -> Option<&SectionScore> {
        self.questionnaire_sections.get(&section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u32,
    /// `None` when the stored value was not a recognised gender.
    pub gender: Option<Gender>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub date_of_birth: NaiveDate,
}

/// Aggregate for one KOOS/WOMAC section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub questions: Vec<String>,
    pub scores: Vec<u8>,
    pub avg: f64,
    pub total: u32,
    /// 100 = best. Not clamped: averages below 1 give values above 100.
    pub normalized_0_100: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionQuestion {
    pub code: String,
    pub question: String,
    /// Raw answer, 0 (no difficulty) to 4 (extreme).
    pub score: u8,
    /// Standing positions this question informs. Empty outside the
    /// weight-bearing bucket.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBucket {
    pub description: String,
    pub questions: Vec<PositionQuestion>,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionQuestions {
    pub weight_bearing_spectrum: PositionBucket,
    pub quadruped: PositionBucket,
    pub lying: PositionBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flexibility {
    pub toe_touch_test: ToeTouch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StsAssessment {
    pub repetition_count: u32,
    /// Average band for the patient's age/gender, e.g. `"10 - 13"`.
    pub benchmark_range: String,
    pub benchmark_performance: BenchmarkPerformance,
    pub trunk_sway: SwayStatus,
    pub hip_sway: SwayStatus,
    pub knee_alignment: KneeAlignment,
}
