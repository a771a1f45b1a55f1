//! Biomechanical rule engine.
//!
//! Maps STS and flexibility findings onto muscle-targeting strategies for the
//! recommendation prompt. Rules are evaluated in declaration order and that
//! order is carried into the prompt, so earlier rules get more emphasis.

use serde::{Deserialize, Serialize};

use crate::models::enums::{KneeAlignment, SwayStatus, ToeTouch};
use crate::models::PatientProfile;

/// One finding the recommender should steer exercise selection toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomechanicalTarget {
    pub issue: String,
    pub strategy: String,
    pub examples: Vec<String>,
}

impl BiomechanicalTarget {
    fn new(issue: impl Into<String>, strategy: &str, examples: &[&str]) -> Self {
        Self {
            issue: issue.into(),
            strategy: strategy.to_string(),
            examples: examples.iter().map(|e| e.to_string()).collect(),
        }
    }
}

struct Rule {
    name: &'static str,
    applies: fn(&PatientProfile) -> bool,
    build: fn(&PatientProfile) -> BiomechanicalTarget,
}

// ── Rules (evaluation order is output order) ──

const RULES: &[Rule] = &[
    Rule {
        name: "valgus",
        applies: |p| p.sts_assessment.knee_alignment == KneeAlignment::Valgus,
        build: |_| valgus_target(),
    },
    Rule {
        name: "varus",
        applies: |p| p.sts_assessment.knee_alignment == KneeAlignment::Varus,
        build: |_| varus_target(),
    },
    Rule {
        name: "limited_flexibility",
        applies: |p| p.flexibility.toe_touch_test == ToeTouch::Cannot,
        build: |_| limited_flexibility_target(),
    },
    Rule {
        name: "core_instability",
        applies: |p| {
            p.sts_assessment.trunk_sway == SwayStatus::Present
                || p.sts_assessment.hip_sway == SwayStatus::Present
        },
        build: core_instability_target,
    },
    Rule {
        name: "good_flexibility",
        applies: |p| p.flexibility.toe_touch_test == ToeTouch::Can,
        build: |_| good_flexibility_target(),
    },
];

const CAPACITY_GUIDANCE: &str = "Match muscle role to functional capacity: for lower function \
patient, try to find those muscle target in muscles.primary_movers or muscles.secondary_movers; \
for higher function patient, prioritize finding those muscle target in muscles.stabiliser";

fn valgus_target() -> BiomechanicalTarget {
    BiomechanicalTarget::new(
        "Dynamic knee instability (Valgus alignment - knock-knees)",
        &format!(
            "Dynamic knee instability usually associates with weak core anti-rotation control, \
             to prioritize exercises with `core_contra=true`. Prioritize exercises with high \
             glute_med_min in muscles.primary_movers or muscles.secondary_movers (value 4-5). \
             {CAPACITY_GUIDANCE}"
        ),
        &["Side lying clamshell", "hip abduction", "side plank variations"],
    )
}

fn varus_target() -> BiomechanicalTarget {
    BiomechanicalTarget::new(
        "Dynamic knee instability (Varus alignment - bow-legged)",
        &format!(
            "Dynamic knee instability usually associates with weak core anti-rotation control, \
             to prioritize exercises with `core_contra=true`. Prioritize exercises with high \
             adductors in muscles (value 4-5). {CAPACITY_GUIDANCE}"
        ),
        &["Copenhagen adductor exercises", "adductor squeezes"],
    )
}

fn limited_flexibility_target() -> BiomechanicalTarget {
    BiomechanicalTarget::new(
        "Limited posterior chain flexibility (cannot touch toes)",
        "Prioritize exercises with high hamstring + glute_max in muscles (value 4-5 each)",
        &["Glute bridges", "hamstring bridges", "hip hinge exercises"],
    )
}

fn core_instability_target(profile: &PatientProfile) -> BiomechanicalTarget {
    let sts = &profile.sts_assessment;
    let mut sway_types = Vec::with_capacity(2);
    if sts.trunk_sway == SwayStatus::Present {
        sway_types.push("trunk sway");
    }
    if sts.hip_sway == SwayStatus::Present {
        sway_types.push("hip sway");
    }

    BiomechanicalTarget::new(
        format!("Core instability ({} present)", sway_types.join(" and ")),
        "Prioritize exercises where `core_ipsi=true`",
        &["Exercises requiring ipsilateral core stability"],
    )
}

fn good_flexibility_target() -> BiomechanicalTarget {
    BiomechanicalTarget::new(
        "Good posterior chain flexibility (can touch toes)",
        "Patient has adequate hamstring/glute flexibility. May consider Quadruped Position over \
         Supine if kneeling tolerance allows.",
        &["Quadruped exercises may be appropriate"],
    )
}

/// Evaluate every rule against the profile. Never fails; no match is an
/// empty list.
pub fn identify_targets(profile: &PatientProfile) -> Vec<BiomechanicalTarget> {
    let targets: Vec<BiomechanicalTarget> = RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| {
            tracing::debug!(rule = rule.name, "Biomechanical rule matched");
            (rule.build)(profile)
        })
        .collect();

    tracing::info!(count = targets.len(), "Biomechanical targets identified");
    targets
}

/// Render targets as the numbered block spliced into the recommendation prompt.
pub fn format_targets_for_prompt(targets: &[BiomechanicalTarget]) -> String {
    if targets.is_empty() {
        return "No specific biomechanical targets identified.".to_string();
    }

    let mut lines = vec![
        "IDENTIFIED BIOMECHANICAL TARGETS FOR THIS PATIENT:".to_string(),
        String::new(),
    ];
    for (i, target) in targets.iter().enumerate() {
        lines.push(format!("{}. Issue: {}", i + 1, target.issue));
        lines.push(format!("   Strategy: {}", target.strategy));
        lines.push(format!("   Examples: {}", target.examples.join(", ")));
        lines.push(String::new());
    }
    lines.join("\n")
}
