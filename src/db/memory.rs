use std::collections::HashMap;

use super::{DatabaseError, PatientRecordSource};
use crate::models::{ExerciseRecord, RawDemographics, RawQuestionnaire, RawStsAssessment};

/// In-memory record source for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    demographics: HashMap<String, RawDemographics>,
    questionnaires: HashMap<String, RawQuestionnaire>,
    sts: HashMap<String, RawStsAssessment>,
    catalog: Vec<ExerciseRecord>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demographics(mut self, record: RawDemographics) -> Self {
        self.demographics.insert(record.patient_id.clone(), record);
        self
    }

    pub fn with_questionnaire(mut self, record: RawQuestionnaire) -> Self {
        self.questionnaires.insert(record.patient_id.clone(), record);
        self
    }

    pub fn with_sts_assessment(mut self, record: RawStsAssessment) -> Self {
        self.sts.insert(record.patient_id.clone(), record);
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<ExerciseRecord>) -> Self {
        self.catalog = catalog;
        self
    }
}

impl PatientRecordSource for InMemoryRecordSource {
    fn demographics(&self, patient_id: &str) -> Result<Option<RawDemographics>, DatabaseError> {
        Ok(self.demographics.get(patient_id).cloned())
    }

    fn questionnaire(&self, patient_id: &str) -> Result<Option<RawQuestionnaire>, DatabaseError> {
        Ok(self.questionnaires.get(patient_id).cloned())
    }

    fn sts_assessment(&self, patient_id: &str) -> Result<Option<RawStsAssessment>, DatabaseError> {
        Ok(self.sts.get(patient_id).cloned())
    }

    fn exercise_catalog(&self) -> Result<Vec<ExerciseRecord>, DatabaseError> {
        Ok(self.catalog.clone())
    }
}
