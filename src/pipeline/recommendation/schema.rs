use crate::pipeline::generation::schema::{
    exact_list, integer, integer_between, object, string, string_list,
};
use crate::pipeline::generation::OutputSchema;
use crate::pipeline::validation::{DIFFICULTY_MAX, DIFFICULTY_MIN, EXERCISE_COUNT, POSITION_COUNT};

pub const RECOMMENDATION_SCHEMA_NAME: &str = "exercise_recommendation";

/// Output format for the recommendation call. Mirrors
/// `GeneratedRecommendation`; targets are not part of it.
pub fn recommendation_schema() -> OutputSchema {
    let muscle_targets = object(vec![
        ("primary", string_list()),
        ("secondary", string_list()),
        ("stabiliser", string_list()),
    ]);

    let selected_exercise = object(vec![
        ("exercise_id", integer()),
        ("exercise_name", string()),
        ("exercise_name_ch", string()),
        ("positions", string_list()),
        ("difficulty", integer_between(DIFFICULTY_MIN, DIFFICULTY_MAX)),
        ("muscle_targets", muscle_targets),
        ("reasoning", string()),
    ]);

    let patient_assessment = object(vec![
        ("capability_summary", string()),
        ("recommended_positions", exact_list(string(), POSITION_COUNT)),
        ("difficulty_range", string()),
    ]);

    OutputSchema {
        name: RECOMMENDATION_SCHEMA_NAME,
        schema: object(vec![
            ("patient_assessment", patient_assessment),
            ("selected_exercises", exact_list(selected_exercise, EXERCISE_COUNT)),
        ]),
    }
}
