use serde_json::Value;

use crate::models::enums::{
    BenchmarkPerformance, ExerciseDecisionKind, RiskLevel, SafetyVerdict, SwayStatus,
};
use crate::pipeline::generation::schema::{
    exact_list, integer, integer_between, list, number, object, string, string_enum, string_list,
};
use crate::pipeline::generation::OutputSchema;
use crate::pipeline::validation::{DIFFICULTY_MAX, DIFFICULTY_MIN, EXERCISE_COUNT};

pub const VERIFICATION_SCHEMA_NAME: &str = "safety_verification";

fn check(objective_data: Value) -> Value {
    object(vec![
        ("objective_data", objective_data),
        ("risk_level", string_enum(RiskLevel::values())),
        ("reasoning", string()),
        ("verdict", string_enum(SafetyVerdict::values())),
    ])
}

/// Output format for the verification call. Each check requires the
/// objective fields it cites; all of them decode into `ObjectiveData`.
pub fn verification_schema() -> OutputSchema {
    let sway = || string_enum(SwayStatus::values());

    let weight_bearing = check(object(vec![
        (
            "sts_benchmark_performance",
            string_enum(BenchmarkPerformance::values()),
        ),
        ("trunk_sway", sway()),
        ("hip_sway", sway()),
    ]));
    let kneeling = check(object(vec![
        ("sp5_kneeling", integer()),
        ("pain_avg", number()),
    ]));
    let core_stability = check(object(vec![
        ("trunk_sway", sway()),
        ("hip_sway", sway()),
        ("f2_standing", integer()),
        ("sp4_twisting", integer()),
        ("function_ADL_normalized", number()),
    ]));

    let decision = object(vec![
        ("exercise_id", integer()),
        ("exercise_name", string()),
        ("safety_constraints_triggered", string_list()),
        ("decision", string_enum(ExerciseDecisionKind::values())),
        ("modifications", string_list()),
        ("reasoning", string()),
        ("replacement_suggestion", string()),
    ]);

    let prescribed = object(vec![
        ("exercise_id", integer()),
        ("exercise_name", string()),
        ("exercise_name_ch", string()),
        ("positions", string_list()),
        ("difficulty", integer_between(DIFFICULTY_MIN, DIFFICULTY_MAX)),
        ("modifications", string_list()),
        ("clinical_rationale", string()),
    ]);

    OutputSchema {
        name: VERIFICATION_SCHEMA_NAME,
        schema: object(vec![
            (
                "safety_review",
                object(vec![
                    ("weight_bearing_check", weight_bearing),
                    ("kneeling_check", kneeling),
                    ("core_stability_check", core_stability),
                ]),
            ),
            ("exercise_decisions", list(decision)),
            ("final_prescription", exact_list(prescribed, EXERCISE_COUNT)),
        ]),
    }
}
