//! Raw per-patient rows as the record store hands them over.
//!
//! These are deliberately loose (strings for enum-like fields) because they
//! come from a form-backed store. The profile builder owns interpretation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDemographics {
    pub patient_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Questionnaire answers keyed by lowercase question code (`s1`, `f17`, `sp5`...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestionnaire {
    pub patient_id: String,
    pub answers: BTreeMap<String, u8>,
    pub toe_touch_test: Option<String>,
}

impl RawQuestionnaire {
    /// Score for a question code; unanswered questions count as 0.
    pub fn score(&self, code: &str) -> u8 {
        self.answers.get(code).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStsAssessment {
    pub patient_id: String,
    pub repetition_count: u32,
    pub trunk_sway: String,
    pub hip_sway: String,
    pub knee_alignment: String,
}
