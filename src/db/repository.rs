use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::catalog::{
    join_catalog, CatalogRows, ExerciseRow, MuscleRow, PositionRow, ProgressionRow,
    SafetyConstraintRow, SportRow,
};
use super::{DatabaseError, PatientRecordSource};
use crate::models::enums::{MuscleRole, ProgressionKind};
use crate::models::{ExerciseRecord, MuscleLoad, RawDemographics, RawQuestionnaire, RawStsAssessment};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Patient records ─────────────────────────────────────────────────────────

pub fn insert_demographics(conn: &Connection, record: &RawDemographics) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_demographics (patient_id, date_of_birth, gender, height_cm, weight_kg)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.patient_id,
            record.date_of_birth.format(DATE_FORMAT).to_string(),
            record.gender,
            record.height_cm,
            record.weight_kg,
        ],
    )?;
    Ok(())
}

pub fn get_demographics(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<RawDemographics>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT patient_id, date_of_birth, gender, height_cm, weight_kg
             FROM patient_demographics WHERE patient_id = ?1",
            params![patient_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((patient_id, dob, gender, height_cm, weight_kg)) = row else {
        return Ok(None);
    };

    let date_of_birth = NaiveDate::parse_from_str(&dob, DATE_FORMAT).map_err(|_| {
        DatabaseError::InvalidValue {
            field: "date_of_birth".into(),
            value: dob.clone(),
        }
    })?;

    Ok(Some(RawDemographics {
        patient_id,
        date_of_birth,
        gender,
        height_cm,
        weight_kg,
    }))
}

pub fn insert_questionnaire(conn: &Connection, record: &RawQuestionnaire) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO questionnaire_responses (patient_id, toe_touch_test) VALUES (?1, ?2)",
        params![record.patient_id, record.toe_touch_test],
    )?;
    for (code, score) in &record.answers {
        tx.execute(
            "INSERT INTO questionnaire_answers (patient_id, question_code, score) VALUES (?1, ?2, ?3)",
            params![record.patient_id, code, score],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub fn get_questionnaire(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<RawQuestionnaire>, DatabaseError> {
    let toe_touch_test = conn
        .query_row(
            "SELECT toe_touch_test FROM questionnaire_responses WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;

    let Some(toe_touch_test) = toe_touch_test else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT question_code, score FROM questionnaire_answers WHERE patient_id = ?1",
    )?;
    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, u8>(1)?))
    })?;

    let mut answers = BTreeMap::new();
    for row in rows {
        let (code, score) = row?;
        answers.insert(code.to_lowercase(), score);
    }

    Ok(Some(RawQuestionnaire {
        patient_id: patient_id.to_string(),
        answers,
        toe_touch_test,
    }))
}

pub fn insert_sts_assessment(
    conn: &Connection,
    record: &RawStsAssessment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sts_assessments (patient_id, repetition_count, trunk_sway, hip_sway, knee_alignment)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.patient_id,
            record.repetition_count,
            record.trunk_sway,
            record.hip_sway,
            record.knee_alignment,
        ],
    )?;
    Ok(())
}

pub fn get_sts_assessment(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<RawStsAssessment>, DatabaseError> {
    let record = conn
        .query_row(
            "SELECT patient_id, repetition_count, trunk_sway, hip_sway, knee_alignment
             FROM sts_assessments WHERE patient_id = ?1",
            params![patient_id],
            |row| {
                Ok(RawStsAssessment {
                    patient_id: row.get(0)?,
                    repetition_count: row.get(1)?,
                    trunk_sway: row.get(2)?,
                    hip_sway: row.get(3)?,
                    knee_alignment: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

// ── Exercise catalog ────────────────────────────────────────────────────────

/// Insert one exercise across the main table and its sub-tables.
pub fn insert_exercise(conn: &Connection, exercise: &ExerciseRecord) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO exercises (id, exercise_name, exercise_name_ch, difficulty_level,
             difficulty_category, core_ipsi, core_contra, toe_touch, clinical_summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            exercise.id,
            exercise.name_en,
            exercise.name_ch,
            exercise.difficulty.level,
            exercise.difficulty.category,
            exercise.core_ipsi as i32,
            exercise.core_contra as i32,
            exercise.toe_touch as i32,
            exercise.clinical_summary,
        ],
    )?;

    for position in &exercise.positions {
        tx.execute(
            "INSERT INTO exercise_positions (exercise_id, position) VALUES (?1, ?2)",
            params![exercise.id, position],
        )?;
    }

    let muscle_groups: [(MuscleRole, &Vec<MuscleLoad>); 3] = [
        (MuscleRole::Primary, &exercise.muscles.primary_movers),
        (MuscleRole::Secondary, &exercise.muscles.secondary_movers),
        (MuscleRole::Stabiliser, &exercise.muscles.stabiliser),
    ];
    for (role, loads) in muscle_groups {
        for load in loads {
            tx.execute(
                "INSERT INTO exercise_muscles (exercise_id, muscle, muscle_type, muscle_value)
                 VALUES (?1, ?2, ?3, ?4)",
                params![exercise.id, load.muscle, role.as_str(), load.value],
            )?;
        }
    }

    let progressions = exercise
        .progression_from
        .iter()
        .map(|name| (ProgressionKind::Regression, name))
        .chain(
            exercise
                .progression_to
                .iter()
                .map(|name| (ProgressionKind::Progression, name)),
        );
    for (kind, name) in progressions {
        tx.execute(
            "INSERT INTO exercise_progressions (exercise_id, progression_type, related_exercise_name)
             VALUES (?1, ?2, ?3)",
            params![exercise.id, kind.as_str(), name],
        )?;
    }

    for constraint in &exercise.safety_constraints {
        tx.execute(
            "INSERT INTO exercise_safety_constraints (exercise_id, constraint_type) VALUES (?1, ?2)",
            params![exercise.id, constraint],
        )?;
    }

    for sport in &exercise.sport_similarity {
        tx.execute(
            "INSERT INTO exercise_sports (exercise_id, sport) VALUES (?1, ?2)",
            params![exercise.id, sport],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Read all six catalog tables. Sub-table rows keep insertion order.
pub fn load_catalog_rows(conn: &Connection) -> Result<CatalogRows, DatabaseError> {
    let mut rows = CatalogRows::default();

    let mut stmt = conn.prepare(
        "SELECT id, exercise_name, exercise_name_ch, difficulty_level, difficulty_category,
                core_ipsi, core_contra, toe_touch, clinical_summary
         FROM exercises ORDER BY id",
    )?;
    let mapped = stmt.query_map([], |row| {
        Ok(ExerciseRow {
            id: row.get(0)?,
            name_en: row.get(1)?,
            name_ch: row.get(2)?,
            difficulty_level: row.get(3)?,
            difficulty_category: row.get(4)?,
            core_ipsi: row.get::<_, i32>(5)? != 0,
            core_contra: row.get::<_, i32>(6)? != 0,
            toe_touch: row.get::<_, i32>(7)? != 0,
            clinical_summary: row.get(8)?,
        })
    })?;
    for row in mapped {
        rows.exercises.push(row?);
    }

    let mut stmt =
        conn.prepare("SELECT exercise_id, position FROM exercise_positions ORDER BY rowid")?;
    let mapped = stmt.query_map([], |row| {
        Ok(PositionRow {
            exercise_id: row.get(0)?,
            position: row.get(1)?,
        })
    })?;
    for row in mapped {
        rows.positions.push(row?);
    }

    let mut stmt = conn.prepare(
        "SELECT exercise_id, muscle, muscle_type, muscle_value FROM exercise_muscles ORDER BY rowid",
    )?;
    let mapped = stmt.query_map([], |row| {
        Ok(MuscleRow {
            exercise_id: row.get(0)?,
            muscle: row.get(1)?,
            muscle_type: row.get(2)?,
            muscle_value: row.get(3)?,
        })
    })?;
    for row in mapped {
        rows.muscles.push(row?);
    }

    let mut stmt = conn.prepare(
        "SELECT exercise_id, progression_type, related_exercise_name
         FROM exercise_progressions ORDER BY rowid",
    )?;
    let mapped = stmt.query_map([], |row| {
        Ok(ProgressionRow {
            exercise_id: row.get(0)?,
            progression_type: row.get(1)?,
            related_exercise_name: row.get(2)?,
        })
    })?;
    for row in mapped {
        rows.progressions.push(row?);
    }

    let mut stmt = conn.prepare(
        "SELECT exercise_id, constraint_type FROM exercise_safety_constraints ORDER BY rowid",
    )?;
    let mapped = stmt.query_map([], |row| {
        Ok(SafetyConstraintRow {
            exercise_id: row.get(0)?,
            constraint_type: row.get(1)?,
        })
    })?;
    for row in mapped {
        rows.safety_constraints.push(row?);
    }

    let mut stmt = conn.prepare("SELECT exercise_id, sport FROM exercise_sports ORDER BY rowid")?;
    let mapped = stmt.query_map([], |row| {
        Ok(SportRow {
            exercise_id: row.get(0)?,
            sport: row.get(1)?,
        })
    })?;
    for row in mapped {
        rows.sports.push(row?);
    }

    Ok(rows)
}

/// SQLite-backed record source.
pub struct SqliteRecordSource {
    conn: Connection,
}

impl SqliteRecordSource {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PatientRecordSource for SqliteRecordSource {
    fn demographics(&self, patient_id: &str) -> Result<Option<RawDemographics>, DatabaseError> {
        get_demographics(&self.conn, patient_id)
    }

    fn questionnaire(&self, patient_id: &str) -> Result<Option<RawQuestionnaire>, DatabaseError> {
        get_questionnaire(&self.conn, patient_id)
    }

    fn sts_assessment(&self, patient_id: &str) -> Result<Option<RawStsAssessment>, DatabaseError> {
        get_sts_assessment(&self.conn, patient_id)
    }

    fn exercise_catalog(&self) -> Result<Vec<ExerciseRecord>, DatabaseError> {
        let rows = load_catalog_rows(&self.conn)?;
        Ok(join_catalog(rows))
    }
}
