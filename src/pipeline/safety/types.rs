use serde::{Deserialize, Serialize};

use crate::models::enums::{
    BenchmarkPerformance, ExerciseDecisionKind, RiskLevel, SafetyVerdict, SwayStatus,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyVerificationOutput {
    pub safety_review: SafetyReview,
    pub exercise_decisions: Vec<ExerciseDecision>,
    pub final_prescription: Vec<FinalPrescriptionExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReview {
    pub weight_bearing_check: SafetyCheck,
    pub kneeling_check: SafetyCheck,
    pub core_stability_check: SafetyCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheck {
    pub objective_data: ObjectiveData,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub verdict: SafetyVerdict,
}

/// Measurements a check cites. One shape for all three checks; each check
/// fills the fields it uses:
///
/// - weight-bearing: STS performance, trunk and hip sway
/// - kneeling: `sp5_kneeling`, `pain_avg`
/// - core stability: sway, `f2_standing`, `sp4_twisting`, ADL function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_benchmark_performance: Option<BenchmarkPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_sway: Option<SwayStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hip_sway: Option<SwayStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp5_kneeling: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f2_standing: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp4_twisting: Option<i64>,
    #[serde(
        rename = "function_ADL_normalized",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub function_adl_normalized: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDecision {
    pub exercise_id: i64,
    pub exercise_name: String,
    /// Any of `weight_bearing`, `kneeling`, `core_stability`.
    pub safety_constraints_triggered: Vec<String>,
    pub decision: ExerciseDecisionKind,
    pub modifications: Vec<String>,
    pub reasoning: String,
    /// Expected only on `REJECTED`; empty otherwise.
    #[serde(default)]
    pub replacement_suggestion: String,
}

impl ExerciseDecision {
    pub fn is_rejected(&self) -> bool {
        self.decision == ExerciseDecisionKind::Rejected
    }

    pub fn has_replacement(&self) -> bool {
        !self.replacement_suggestion.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPrescriptionExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub exercise_name_ch: String,
    pub positions: Vec<String>,
    pub difficulty: i64,
    pub modifications: Vec<String>,
    pub clinical_rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::verification_json;

    #[test]
    fn decodes_service_json() {
        let output: SafetyVerificationOutput = serde_json::from_value(verification_json()).unwrap();
        assert_eq!(output.final_prescription.len(), 4);
        assert_eq!(output.exercise_decisions[3].decision, ExerciseDecisionKind::Rejected);
        assert!(output.exercise_decisions[3].has_replacement());

        let kneeling = &output.safety_review.kneeling_check;
        assert_eq!(kneeling.objective_data.sp5_kneeling, Some(4));
        assert_eq!(kneeling.objective_data.trunk_sway, None);
        assert_eq!(kneeling.verdict, SafetyVerdict::HighRisk);

        let core = &output.safety_review.core_stability_check.objective_data;
        assert_eq!(core.function_adl_normalized, Some(96.1));
    }

    #[test]
    fn unused_objective_fields_are_omitted() {
        let data = ObjectiveData {
            sp5_kneeling: Some(3),
            pain_avg: Some(1.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"sp5_kneeling": 3, "pain_avg": 1.5}));
    }

    #[test]
    fn missing_replacement_defaults_to_empty() {
        let decision: ExerciseDecision = serde_json::from_value(serde_json::json!({
            "exercise_id": 1,
            "exercise_name": "Wall sit",
            "safety_constraints_triggered": ["weight_bearing"],
            "decision": "APPROVED WITH MODIFICATIONS",
            "modifications": ["Reduce depth"],
            "reasoning": "Moderate weight-bearing risk"
        }))
        .unwrap();
        assert!(!decision.has_replacement());
        assert!(!decision.is_rejected());
    }

    #[test]
    fn unknown_decision_label_fails_to_decode() {
        let result: Result<ExerciseDecision, _> = serde_json::from_value(serde_json::json!({
            "exercise_id": 1,
            "exercise_name": "Wall sit",
            "safety_constraints_triggered": [],
            "decision": "MAYBE",
            "modifications": [],
            "reasoning": ""
        }));
        assert!(result.is_err());
    }
}
