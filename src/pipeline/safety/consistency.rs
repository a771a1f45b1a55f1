//! Cross-checks between the recommendation and the safety review.
//!
//! Findings are advisory. The verification stage leaves decision/prescription
//! consistency to the generation service, so these are reported, never
//! enforced.

use serde::Serialize;

use super::types::SafetyVerificationOutput;
use crate::models::enums::ExerciseDecisionKind;
use crate::pipeline::recommendation::RecommendationOutput;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyFinding {
    /// A `REJECTED` exercise still appears in the final prescription.
    RejectedStillPrescribed { exercise_id: i64 },
    /// A `REJECTED` decision carries no replacement suggestion.
    RejectedWithoutReplacement { exercise_id: i64 },
    /// A replacement was suggested for an exercise that was not rejected.
    ReplacementOnNonRejected {
        exercise_id: i64,
        decision: ExerciseDecisionKind,
    },
    /// A proposed exercise received no decision.
    SelectedWithoutDecision { exercise_id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub findings: Vec<ConsistencyFinding>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn check_decision_consistency(
    recommendation: &RecommendationOutput,
    verification: &SafetyVerificationOutput,
) -> ConsistencyReport {
    let mut findings = Vec::new();

    for decision in &verification.exercise_decisions {
        let id = decision.exercise_id;
        if decision.is_rejected() {
            if verification
                .final_prescription
                .iter()
                .any(|e| e.exercise_id == id)
            {
                findings.push(ConsistencyFinding::RejectedStillPrescribed { exercise_id: id });
            }
            if !decision.has_replacement() {
                findings.push(ConsistencyFinding::RejectedWithoutReplacement { exercise_id: id });
            }
        } else if decision.has_replacement() {
            findings.push(ConsistencyFinding::ReplacementOnNonRejected {
                exercise_id: id,
                decision: decision.decision,
            });
        }
    }

    for selected in &recommendation.selected_exercises {
        let decided = verification
            .exercise_decisions
            .iter()
            .any(|d| d.exercise_id == selected.exercise_id);
        if !decided {
            findings.push(ConsistencyFinding::SelectedWithoutDecision {
                exercise_id: selected.exercise_id,
            });
        }
    }

    if !findings.is_empty() {
        tracing::warn!(
            finding_count = findings.len(),
            "Safety decisions inconsistent with prescription"
        );
    }

    ConsistencyReport { findings }
}
