use serde::{Deserialize, Serialize};

/// One muscle and its recruitment level (1-5) within an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleLoad {
    pub muscle: String,
    pub value: u8,
}

pub const MUSCLE_VALUE_MIN: u8 = 1;
pub const MUSCLE_VALUE_MAX: u8 = 5;

/// Muscles grouped by the role they play in the exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuscleGroups {
    pub primary_movers: Vec<MuscleLoad>,
    pub secondary_movers: Vec<MuscleLoad>,
    pub stabiliser: Vec<MuscleLoad>,
}

impl MuscleGroups {
    /// Every load across the three roles.
    pub fn iter(&self) -> impl Iterator<Item = &MuscleLoad> {
        self.primary_movers
            .iter()
            .chain(&self.secondary_movers)
            .chain(&self.stabiliser)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: i32,
    pub category: String,
}

/// A catalog exercise, joined from the main table and its five sub-tables.
/// Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: i64,
    #[serde(rename = "exercise_name")]
    pub name_en: String,
    #[serde(rename = "exercise_name_ch")]
    pub name_ch: String,
    pub positions: Vec<String>,
    pub muscles: MuscleGroups,
    pub difficulty: Difficulty,
    pub safety_constraints: Vec<String>,
    pub sport_similarity: Vec<String>,
    pub progression_from: Vec<String>,
    pub progression_to: Vec<String>,
    pub core_ipsi: bool,
    pub core_contra: bool,
    pub toe_touch: bool,
    pub clinical_summary: String,
}

/// Lookup helper over a catalog slice.
pub fn find_exercise(catalog: &[ExerciseRecord], id: i64) -> Option<&ExerciseRecord> {
    catalog.iter().find(|e| e.id == id)
}
