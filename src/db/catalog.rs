//! Exercise catalog join.
//!
//! The catalog is stored normalised across six tables. `join_catalog`
//! folds the sub-table rows onto their main rows, keeping main-table order.

use std::collections::HashMap;
use std::str::FromStr;

use crate::models::enums::{MuscleRole, ProgressionKind};
use crate::models::{Difficulty, ExerciseRecord, MuscleGroups, MuscleLoad};

/// Row of the `exercises` table.
#[derive(Debug, Clone)]
pub struct ExerciseRow {
    pub id: i64,
    pub name_en: String,
    pub name_ch: String,
    pub difficulty_level: i32,
    pub difficulty_category: String,
    pub core_ipsi: bool,
    pub core_contra: bool,
    pub toe_touch: bool,
    pub clinical_summary: String,
}

#[derive(Debug, Clone)]
pub struct PositionRow {
    pub exercise_id: i64,
    pub position: String,
}

/// `muscle_type` is `P` (primary), `N` (secondary) or `S` (stabiliser).
#[derive(Debug, Clone)]
pub struct MuscleRow {
    pub exercise_id: i64,
    pub muscle: String,
    pub muscle_type: String,
    pub muscle_value: u8,
}

/// `progression_type` is `regression` or `progression`.
#[derive(Debug, Clone)]
pub struct ProgressionRow {
    pub exercise_id: i64,
    pub progression_type: String,
    pub related_exercise_name: String,
}

#[derive(Debug, Clone)]
pub struct SafetyConstraintRow {
    pub exercise_id: i64,
    pub constraint_type: String,
}

#[derive(Debug, Clone)]
pub struct SportRow {
    pub exercise_id: i64,
    pub sport: String,
}

/// All six row sets of the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub exercises: Vec<ExerciseRow>,
    pub positions: Vec<PositionRow>,
    pub muscles: Vec<MuscleRow>,
    pub progressions: Vec<ProgressionRow>,
    pub safety_constraints: Vec<SafetyConstraintRow>,
    pub sports: Vec<SportRow>,
}

#[derive(Default)]
struct Related {
    positions: Vec<String>,
    muscles: MuscleGroups,
    progression_from: Vec<String>,
    progression_to: Vec<String>,
    safety_constraints: Vec<String>,
    sport_similarity: Vec<String>,
}

/// Join the catalog tables into `ExerciseRecord`s.
///
/// Rows with an unknown muscle or progression tag are skipped (and logged)
/// rather than failing the whole catalog. Sub-table rows for ids missing
/// from the main table are ignored.
pub fn join_catalog(rows: CatalogRows) -> Vec<ExerciseRecord> {
    let mut related: HashMap<i64, Related> = HashMap::new();

    for row in rows.positions {
        related.entry(row.exercise_id).or_default().positions.push(row.position);
    }

    for row in rows.muscles {
        let Ok(role) = MuscleRole::from_str(&row.muscle_type) else {
            tracing::warn!(
                exercise_id = row.exercise_id,
                muscle_type = %row.muscle_type,
                "Skipping muscle row with unknown role tag"
            );
            continue;
        };
        let load = MuscleLoad {
            muscle: row.muscle,
            value: row.muscle_value,
        };
        let groups = &mut related.entry(row.exercise_id).or_default().muscles;
        match role {
            MuscleRole::Primary => groups.primary_movers.push(load),
            MuscleRole::Secondary => groups.secondary_movers.push(load),
            MuscleRole::Stabiliser => groups.stabiliser.push(load),
        }
    }

    for row in rows.progressions {
        let Ok(kind) = ProgressionKind::from_str(&row.progression_type) else {
            tracing::warn!(
                exercise_id = row.exercise_id,
                progression_type = %row.progression_type,
                "Skipping progression row with unknown type"
            );
            continue;
        };
        let entry = related.entry(row.exercise_id).or_default();
        match kind {
            ProgressionKind::Regression => entry.progression_from.push(row.related_exercise_name),
            ProgressionKind::Progression => entry.progression_to.push(row.related_exercise_name),
        }
    }

    for row in rows.safety_constraints {
        related
            .entry(row.exercise_id)
            .or_default()
            .safety_constraints
            .push(row.constraint_type);
    }

    for row in rows.sports {
        related.entry(row.exercise_id).or_default().sport_similarity.push(row.sport);
    }

    rows.exercises
        .into_iter()
        .map(|ex| {
            let rel = related.remove(&ex.id).unwrap_or_default();
            ExerciseRecord {
                id: ex.id,
                name_en: ex.name_en,
                name_ch: ex.name_ch,
                positions: rel.positions,
                muscles: rel.muscles,
                difficulty: Difficulty {
                    level: ex.difficulty_level,
                    category: ex.difficulty_category,
                },
                safety_constraints: rel.safety_constraints,
                sport_similarity: rel.sport_similarity,
                progression_from: rel.progression_from,
                progression_to: rel.progression_to,
                core_ipsi: ex.core_ipsi,
                core_contra: ex.core_contra,
                toe_touch: ex.toe_touch,
                clinical_summary: ex.clinical_summary,
            }
        })
        .collect()
}
