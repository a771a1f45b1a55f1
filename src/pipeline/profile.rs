//! Profile builder: composes normalised scores, demographics, STS findings
//! and the exercise catalog into one immutable `PatientProfile`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::scoring::{
    age, position_questions, section_scores, sts_benchmark, MAX_ANSWER_SCORE,
};
use crate::db::{DatabaseError, PatientRecordSource};
use crate::models::enums::{Gender, KneeAlignment, SwayStatus, ToeTouch};
use crate::models::{
    Demographics, ExerciseRecord, Flexibility, PatientProfile, RawDemographics, RawQuestionnaire,
    RawStsAssessment, StsAssessment, MUSCLE_VALUE_MAX, MUSCLE_VALUE_MIN,
};

/// The three per-patient records the builder requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Demographics,
    Questionnaire,
    StsAssessment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demographics => write!(f, "demographics"),
            Self::Questionnaire => write!(f, "questionnaire"),
            Self::StsAssessment => write!(f, "STS assessment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("No {record} record found for patient {patient_id}")]
    MissingRecord {
        record: RecordKind,
        patient_id: String,
    },

    #[error("Exercise catalog is empty")]
    EmptyCatalog,

    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Exercise {exercise_id} appears more than once in the catalog")]
    DuplicateExercise { exercise_id: i64 },

    #[error("Exercise {exercise_id}: {muscle} recruitment {value} outside 1-5")]
    MuscleValueOutOfRange {
        exercise_id: i64,
        muscle: String,
        value: u8,
    },

    #[error("Record store error: {0}")]
    Database(#[from] DatabaseError),
}

/// Raw inputs for one patient, as fetched. `None` means the record is absent.
#[derive(Debug, Clone, Default)]
pub struct RawPatientRecords {
    pub patient_id: String,
    pub demographics: Option<RawDemographics>,
    pub questionnaire: Option<RawQuestionnaire>,
    pub sts: Option<RawStsAssessment>,
}

/// Build the canonical profile from raw records and the catalog.
///
/// `today` anchors the age calculation so builds are reproducible.
pub fn build_profile(
    records: RawPatientRecords,
    catalog: Vec<ExerciseRecord>,
    today: NaiveDate,
) -> Result<PatientProfile, ProfileError> {
    let missing = |record| ProfileError::MissingRecord {
        record,
        patient_id: records.patient_id.clone(),
    };
    let demographics = records
        .demographics
        .clone()
        .ok_or_else(|| missing(RecordKind::Demographics))?;
    let questionnaire = records
        .questionnaire
        .clone()
        .ok_or_else(|| missing(RecordKind::Questionnaire))?;
    let sts = records
        .sts
        .clone()
        .ok_or_else(|| missing(RecordKind::StsAssessment))?;

    check_answers(&questionnaire)?;
    check_catalog(&catalog)?;

    let years = age(demographics.date_of_birth, today);
    let age = u32::try_from(years).map_err(|_| ProfileError::InvalidField {
        field: "date_of_birth".into(),
        value: demographics.date_of_birth.to_string(),
    })?;

    let gender = parse_gender(&demographics.gender);
    if gender.is_none() {
        tracing::warn!(
            patient_id = %records.patient_id,
            "Unrecognised gender, using default STS thresholds"
        );
    }

    let benchmark = sts_benchmark(age, gender, sts.repetition_count);

    Ok(PatientProfile {
        demographics: Demographics {
            age,
            gender,
            height_cm: demographics.height_cm,
            weight_kg: demographics.weight_kg,
            date_of_birth: demographics.date_of_birth,
        },
        questionnaire_sections: section_scores(&questionnaire),
        position_relevant_questions: position_questions(&questionnaire),
        flexibility: Flexibility {
            toe_touch_test: parse_toe_touch(questionnaire.toe_touch_test.as_deref()),
        },
        sts_assessment: StsAssessment {
            repetition_count: sts.repetition_count,
            benchmark_range: benchmark.range,
            benchmark_performance: benchmark.performance,
            trunk_sway: parse_sway("trunk_sway", &sts.trunk_sway)?,
            hip_sway: parse_sway("hip_sway", &sts.hip_sway)?,
            knee_alignment: KneeAlignment::from(sts.knee_alignment),
        },
        exercises: catalog,
    })
}

/// Fetch the three records and the catalog, then build.
pub fn build_for_patient(
    source: &dyn PatientRecordSource,
    patient_id: &str,
    today: NaiveDate,
) -> Result<PatientProfile, ProfileError> {
    let _span = tracing::info_span!("build_profile", patient_id = %patient_id).entered();

    let records = RawPatientRecords {
        patient_id: patient_id.to_string(),
        demographics: source.demographics(patient_id)?,
        questionnaire: source.questionnaire(patient_id)?,
        sts: source.sts_assessment(patient_id)?,
    };
    let catalog = source.exercise_catalog()?;

    let profile = build_profile(records, catalog, today)?;
    tracing::info!(
        age = profile.demographics.age,
        performance = %profile.sts_assessment.benchmark_performance,
        catalog_size = profile.exercises.len(),
        "Patient profile built"
    );
    Ok(profile)
}

/// Every stored answer must sit on the 0-4 scale.
fn check_answers(questionnaire: &RawQuestionnaire) -> Result<(), ProfileError> {
    match questionnaire
        .answers
        .iter()
        .find(|&(_, &score)| score > MAX_ANSWER_SCORE)
    {
        Some((code, score)) => Err(ProfileError::InvalidField {
            field: code.clone(),
            value: score.to_string(),
        }),
        None => Ok(()),
    }
}

/// Non-empty, unique ids, muscle recruitment within 1-5.
fn check_catalog(catalog: &[ExerciseRecord]) -> Result<(), ProfileError> {
    if catalog.is_empty() {
        return Err(ProfileError::EmptyCatalog);
    }

    let mut seen = HashSet::with_capacity(catalog.len());
    for exercise in catalog {
        if !seen.insert(exercise.id) {
            return Err(ProfileError::DuplicateExercise {
                exercise_id: exercise.id,
            });
        }
        if let Some(load) = exercise
            .muscles
            .iter()
            .find(|m| !(MUSCLE_VALUE_MIN..=MUSCLE_VALUE_MAX).contains(&m.value))
        {
            return Err(ProfileError::MuscleValueOutOfRange {
                exercise_id: exercise.id,
                muscle: load.muscle.clone(),
                value: load.value,
            });
        }
    }
    Ok(())
}

fn parse_gender(raw: &str) -> Option<Gender> {
    match raw.trim().to_lowercase().as_str() {
        "male" | "m" => Some(Gender::Male),
        "female" | "f" => Some(Gender::Female),
        _ => None,
    }
}

/// Absent answer reads as `cannot`; anything unrecognised as `other`.
fn parse_toe_touch(raw: Option<&str>) -> ToeTouch {
    match raw {
        None => ToeTouch::Cannot,
        Some(value) => match value.trim().to_lowercase().as_str() {
            "can" => ToeTouch::Can,
            "cannot" => ToeTouch::Cannot,
            _ => ToeTouch::Other,
        },
    }
}

fn parse_sway(field: &str, raw: &str) -> Result<SwayStatus, ProfileError> {
    SwayStatus::from_str(&raw.trim().to_lowercase()).map_err(|_| ProfileError::InvalidField {
        field: field.into(),
        value: raw.into(),
    })
}
