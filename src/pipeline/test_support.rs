//! Shared fixtures for pipeline tests: a reference patient (67-year-old
//! female, valgus, trunk sway, cannot touch toes, 14 STS reps) and a small
//! catalog the canned generation responses refer to.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::profile::{build_profile, RawPatientRecords};
use crate::models::{
    Difficulty, ExerciseRecord, MuscleGroups, MuscleLoad, PatientProfile, RawDemographics,
    RawQuestionnaire, RawStsAssessment,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn sample_demographics() -> RawDemographics {
    RawDemographics {
        patient_id: "p-001".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1958, 3, 12).unwrap(),
        gender: "Female".into(),
        height_cm: 162.0,
        weight_kg: 68.5,
    }
}

pub fn sample_questionnaire() -> RawQuestionnaire {
    let mut answers = BTreeMap::new();
    for code in ["s1", "s2", "s3", "s4", "s5", "st1", "st2"] {
        answers.insert(code.to_string(), 1);
    }
    for i in 1..=9 {
        answers.insert(format!("p{i}"), 2);
    }
    for i in 1..=17 {
        answers.insert(format!("f{i}"), 1);
    }
    answers.insert("f2".into(), 2);
    for (code, score) in [("sp1", 2), ("sp2", 3), ("sp3", 3), ("sp4", 3), ("sp5", 4)] {
        answers.insert(code.to_string(), score);
    }
    for i in 1..=4 {
        answers.insert(format!("q{i}"), 2);
    }

    RawQuestionnaire {
        patient_id: "p-001".into(),
        answers,
        toe_touch_test: Some("cannot".into()),
    }
}

pub fn sample_sts() -> RawStsAssessment {
    RawStsAssessment {
        patient_id: "p-001".into(),
        repetition_count: 14,
        trunk_sway: "present".into(),
        hip_sway: "absent".into(),
        knee_alignment: "valgus".into(),
    }
}

fn load(muscle: &str, value: u8) -> MuscleLoad {
    MuscleLoad {
        muscle: muscle.into(),
        value,
    }
}

fn exercise(
    id: i64,
    name: &str,
    positions: &[&str],
    level: i32,
    muscles: MuscleGroups,
    core_ipsi: bool,
    core_contra: bool,
) -> ExerciseRecord {
    ExerciseRecord {
        id,
        name_en: name.into(),
        name_ch: format!("{name} (zh)"),
        positions: positions.iter().map(|p| p.to_string()).collect(),
        muscles,
        difficulty: Difficulty {
            level,
            category: if level <= 3 { "beginner" } else { "intermediate" }.into(),
        },
        safety_constraints: if positions.contains(&"quadruped") {
            vec!["kneeling".into()]
        } else {
            vec![]
        },
        sport_similarity: vec![],
        progression_from: vec![],
        progression_to: vec![],
        core_ipsi,
        core_contra,
        toe_touch: false,
        clinical_summary: String::new(),
    }
}

pub fn sample_catalog() -> Vec<ExerciseRecord> {
    vec![
        exercise(
            101,
            "Side lying clamshell",
            &["lying"],
            2,
            MuscleGroups {
                primary_movers: vec![load("glute_med_min", 5)],
                secondary_movers: vec![load("glute_max", 3)],
                stabiliser: vec![load("core", 2)],
            },
            false,
            true,
        ),
        exercise(
            102,
            "Glute bridge",
            &["lying"],
            2,
            MuscleGroups {
                primary_movers: vec![load("glute_max", 5)],
                secondary_movers: vec![load("hamstring", 4)],
                stabiliser: vec![load("core", 3)],
            },
            true,
            false,
        ),
        exercise(
            103,
            "Side plank on knees",
            &["lying"],
            3,
            MuscleGroups {
                primary_movers: vec![load("core", 4)],
                secondary_movers: vec![load("glute_med_min", 4)],
                stabiliser: vec![],
            },
            true,
            true,
        ),
        exercise(
            104,
            "Supported split stance hold",
            &["split_stand"],
            3,
            MuscleGroups {
                primary_movers: vec![load("quad", 4)],
                secondary_movers: vec![load("glute_max", 3)],
                stabiliser: vec![load("glute_med_min", 3)],
            },
            true,
            false,
        ),
        exercise(
            105,
            "Bird dog",
            &["quadruped"],
            4,
            MuscleGroups {
                primary_movers: vec![load("core", 4)],
                secondary_movers: vec![load("glute_max", 3)],
                stabiliser: vec![],
            },
            true,
            true,
        ),
        exercise(
            106,
            "Adductor squeeze",
            &["lying"],
            1,
            MuscleGroups {
                primary_movers: vec![load("adductors", 5)],
                secondary_movers: vec![],
                stabiliser: vec![],
            },
            false,
            false,
        ),
    ]
}

pub fn sample_profile() -> PatientProfile {
    let records = RawPatientRecords {
        patient_id: "p-001".into(),
        demographics: Some(sample_demographics()),
        questionnaire: Some(sample_questionnaire()),
        sts: Some(sample_sts()),
    };
    build_profile(records, sample_catalog(), today()).unwrap()
}

fn selected(id: i64, name: &str, difficulty: i64) -> Value {
    json!({
        "exercise_id": id,
        "exercise_name": name,
        "exercise_name_ch": format!("{name} (zh)"),
        "positions": ["lying"],
        "difficulty": difficulty,
        "muscle_targets": {
            "primary": ["glute_max:5"],
            "secondary": ["hamstring:4"],
            "stabiliser": []
        },
        "reasoning": "Matches the identified targets"
    })
}

/// A schema-conformant recommendation response over catalog ids 101-104.
pub fn recommendation_json() -> Value {
    json!({
        "patient_assessment": {
            "capability_summary": "Moderate function with valgus collapse under load.",
            "recommended_positions": ["lying", "split_stand"],
            "difficulty_range": "2-4"
        },
        "selected_exercises": [
            selected(101, "Side lying clamshell", 2),
            selected(102, "Glute bridge", 2),
            selected(103, "Side plank on knees", 3),
            selected(104, "Supported split stance hold", 3),
        ]
    })
}

fn check(verdict: &str, risk: &str, objective: Value) -> Value {
    json!({
        "objective_data": objective,
        "risk_level": risk,
        "reasoning": "Derived from objective data",
        "verdict": verdict
    })
}

fn decision(id: i64, name: &str, decision: &str, replacement: &str) -> Value {
    json!({
        "exercise_id": id,
        "exercise_name": name,
        "safety_constraints_triggered": [],
        "decision": decision,
        "modifications": [],
        "reasoning": "Within tolerance",
        "replacement_suggestion": replacement
    })
}

fn prescribed(id: i64, name: &str) -> Value {
    json!({
        "exercise_id": id,
        "exercise_name": name,
        "exercise_name_ch": format!("{name} (zh)"),
        "positions": ["lying"],
        "difficulty": 2,
        "modifications": [],
        "clinical_rationale": "Addresses the primary target"
    })
}

/// A schema-conformant verification response: 104 rejected and replaced by 106.
pub fn verification_json() -> Value {
    json!({
        "safety_review": {
            "weight_bearing_check": check("safe", "low", json!({
                "sts_benchmark_performance": "Above Average",
                "trunk_sway": "present",
                "hip_sway": "absent"
            })),
            "kneeling_check": check("high_risk", "high", json!({
                "sp5_kneeling": 4,
                "pain_avg": 2.0
            })),
            "core_stability_check": check("moderate_risk", "moderate", json!({
                "trunk_sway": "present",
                "hip_sway": "absent",
                "f2_standing": 2,
                "sp4_twisting": 3,
                "function_ADL_normalized": 96.1
            }))
        },
        "exercise_decisions": [
            decision(101, "Side lying clamshell", "APPROVED", ""),
            decision(102, "Glute bridge", "APPROVED", ""),
            decision(103, "Side plank on knees", "APPROVED WITH MODIFICATIONS", ""),
            decision(104, "Supported split stance hold", "REJECTED", "106 Adductor squeeze"),
        ],
        "final_prescription": [
            prescribed(101, "Side lying clamshell"),
            prescribed(102, "Glute bridge"),
            prescribed(103, "Side plank on knees"),
            prescribed(106, "Adductor squeeze"),
        ]
    })
}
