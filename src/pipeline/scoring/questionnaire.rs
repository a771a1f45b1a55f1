//! KOOS/WOMAC section scoring and position-relevant question buckets.
//!
//! Answers run 0 (none) to 4 (extreme difficulty). Normalisation inverts the
//! scale so that 100 means best function.

use std::collections::BTreeMap;

use super::round_to;
use crate::models::enums::QuestionnaireSection;
use crate::models::{PositionBucket, PositionQuestion, PositionQuestions, RawQuestionnaire, SectionScore};

/// Fixed question-code membership of each section.
pub fn section_codes(section: QuestionnaireSection) -> &'static [&'static str] {
    match section {
        QuestionnaireSection::Symptoms => &["s1", "s2", "s3", "s4", "s5"],
        QuestionnaireSection::Stiffness => &["st1", "st2"],
        QuestionnaireSection::Pain => &["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9"],
        QuestionnaireSection::FunctionAdl => &[
            "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12", "f13",
            "f14", "f15", "f16", "f17",
        ],
        QuestionnaireSection::FunctionSports => &["sp1", "sp2", "sp3", "sp4", "sp5"],
        QuestionnaireSection::QualityOfLife => &["q1", "q2", "q3", "q4"],
    }
}

pub const ALL_SECTIONS: [QuestionnaireSection; 6] = [
    QuestionnaireSection::Symptoms,
    QuestionnaireSection::Stiffness,
    QuestionnaireSection::Pain,
    QuestionnaireSection::FunctionAdl,
    QuestionnaireSection::FunctionSports,
    QuestionnaireSection::QualityOfLife,
];

/// Highest answer on the 0-4 scale.
pub const MAX_ANSWER_SCORE: u8 = 4;

/// `(4 - avg) / 3 * 100`, one decimal. Exceeds 100 when `avg < 1`.
pub fn normalize_section_avg(avg: f64) -> f64 {
    round_to(((4.0 - avg) / 3.0) * 100.0, 1)
}

/// Score every section. Missing answers count as 0.
pub fn section_scores(answers: &RawQuestionnaire) -> BTreeMap<QuestionnaireSection, SectionScore> {
    ALL_SECTIONS
        .iter()
        .map(|&section| (section, score_section(section, answers)))
        .collect()
}

fn score_section(section: QuestionnaireSection, answers: &RawQuestionnaire) -> SectionScore {
    let codes = section_codes(section);
    let scores: Vec<u8> = codes.iter().map(|code| answers.score(code)).collect();
    let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let mean = f64::from(total) / codes.len() as f64;

    SectionScore {
        questions: codes.iter().map(|c| c.to_string()).collect(),
        scores,
        avg: round_to(mean, 2),
        total,
        // Normalised from the unrounded mean
        normalized_0_100: normalize_section_avg(mean),
    }
}

const SCALE_LEGEND: &str = "Score scale: 0=None, 1=Mild, 2=Moderate, 3=Severe, 4=Extreme difficulty.";

const WEIGHT_BEARING_DESCRIPTION: &str = "DL_stand (F4, SP1) → split_stand (F2, F4, SP1, SP4) → SL_stand (F1, F2, SP4) - increasing difficulty";
const WEIGHT_BEARING_GUIDANCE: &str = "Lower scores (0-2) = better capability for standing exercises. Higher scores (3-4) = difficulty with weight-bearing tasks.";
const QUADRUPED_DESCRIPTION: &str = "Kneeling tolerance";
const QUADRUPED_GUIDANCE: &str = "Score 0-2 = can tolerate kneeling. Score 3-4 = avoid quadruped exercises.";
const LYING_DESCRIPTION: &str = "Supine/side lying positions (easiest, assumed safe for all patients)";
const LYING_GUIDANCE: &str = "No specific questions. Lying positions safe by default.";

/// `(code, question text, positions informed)` for the weight-bearing bucket.
const WEIGHT_BEARING_QUESTIONS: &[(&str, &str, &[&str])] = &[
    ("f1", "Descending stairs", &["SL_stand"]),
    ("f2", "Ascending stairs", &["split_stand", "SL_stand"]),
    ("f4", "Standing", &["DL_stand", "split_stand"]),
    ("sp1", "Squatting", &["DL_stand", "split_stand"]),
    ("sp4", "Twisting/pivoting on your injured knee", &["split_stand", "SL_stand"]),
];

const QUADRUPED_QUESTIONS: &[(&str, &str)] = &[("sp5", "Kneeling")];

/// Pull the fixed position-relevant questions into their three buckets.
/// The guidance text is static; only the scores vary per patient.
pub fn position_questions(answers: &RawQuestionnaire) -> PositionQuestions {
    let weight_bearing = WEIGHT_BEARING_QUESTIONS
        .iter()
        .map(|(code, text, positions)| PositionQuestion {
            code: code.to_string(),
            question: text.to_string(),
            score: answers.score(code),
            positions: positions.iter().map(|p| p.to_string()).collect(),
        })
        .collect();

    let quadruped = QUADRUPED_QUESTIONS
        .iter()
        .map(|(code, text)| PositionQuestion {
            code: code.to_string(),
            question: text.to_string(),
            score: answers.score(code),
            positions: Vec::new(),
        })
        .collect();

    PositionQuestions {
        weight_bearing_spectrum: PositionBucket {
            description: WEIGHT_BEARING_DESCRIPTION.into(),
            questions: weight_bearing,
            interpretation: format!("{SCALE_LEGEND} {WEIGHT_BEARING_GUIDANCE}"),
        },
        quadruped: PositionBucket {
            description: QUADRUPED_DESCRIPTION.into(),
            questions: quadruped,
            interpretation: format!("{SCALE_LEGEND} {QUADRUPED_GUIDANCE}"),
        },
        lying: PositionBucket {
            description: LYING_DESCRIPTION.into(),
            questions: Vec::new(),
            interpretation: LYING_GUIDANCE.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers_all(value: u8) -> RawQuestionnaire {
        let mut q = RawQuestionnaire::default();
        for section in ALL_SECTIONS {
            for code in section_codes(section) {
                q.answers.insert(code.to_string(), value);
            }
        }
        q
    }

    #[test]
    fn section_sizes_are_fixed() {
        let sizes: Vec<usize> = ALL_SECTIONS.iter().map(|s| section_codes(*s).len()).collect();
        assert_eq!(sizes, vec![5, 2, 9, 17, 5, 4]);
    }

    #[test]
    fn all_worst_answers_normalise_to_zero() {
        let scores = section_scores(&answers_all(4));
        for score in scores.values() {
            assert!((score.avg - 4.0).abs() < 1e-9);
            assert!(score.normalized_0_100.abs() < 1e-9);
        }
    }

    #[test]
    fn all_zero_answers_exceed_one_hundred_unclamped() {
        let scores = section_scores(&answers_all(0));
        for score in scores.values() {
            assert_eq!(score.total, 0);
            assert!((score.normalized_0_100 - 133.3).abs() < 1e-9);
        }
    }

    #[test]
    fn average_of_one_normalises_to_one_hundred() {
        let scores = section_scores(&answers_all(1));
        for score in scores.values() {
            assert!((score.normalized_0_100 - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_answers_count_as_zero() {
        let mut q = RawQuestionnaire::default();
        q.answers.insert("st1".into(), 3);
        let scores = section_scores(&q);
        let stiffness = &scores[&QuestionnaireSection::Stiffness];
        assert_eq!(stiffness.scores, vec![3, 0]);
        assert_eq!(stiffness.total, 3);
        assert!((stiffness.avg - 1.5).abs() < 1e-9);
        assert!((stiffness.normalized_0_100 - 83.3).abs() < 1e-9);
    }

    #[test]
    fn avg_rounds_to_two_places() {
        let mut q = RawQuestionnaire::default();
        // pain: 1 / 9 = 0.111..
        q.answers.insert("p1".into(), 1);
        let scores = section_scores(&q);
        let pain = &scores[&QuestionnaireSection::Pain];
        assert!((pain.avg - 0.11).abs() < 1e-9);
        assert!((pain.normalized_0_100 - 129.6).abs() < 1e-9);
    }

    #[test]
    fn sections_iterate_in_fixed_order() {
        let scores = section_scores(&RawQuestionnaire::default());
        let keys: Vec<&str> = scores.keys().map(|s| s.as_str()).collect();
        assert_eq!(
            keys,
            vec!["symptoms", "stiffness", "pain", "function_ADL", "function_sports", "quality_of_life"]
        );
    }

    #[test]
    fn position_buckets_carry_scores_and_static_text() {
        let mut q = RawQuestionnaire::default();
        q.answers.insert("f2".into(), 3);
        q.answers.insert("sp5".into(), 4);

        let buckets = position_questions(&q);
        let codes: Vec<&str> = buckets
            .weight_bearing_spectrum
            .questions
            .iter()
            .map(|q| q.code.as_str())
            .collect();
        assert_eq!(codes, vec!["f1", "f2", "f4", "sp1", "sp4"]);
        assert_eq!(buckets.weight_bearing_spectrum.questions[1].score, 3);
        assert_eq!(
            buckets.weight_bearing_spectrum.questions[1].positions,
            vec!["split_stand", "SL_stand"]
        );

        assert_eq!(buckets.quadruped.questions.len(), 1);
        assert_eq!(buckets.quadruped.questions[0].question, "Kneeling");
        assert_eq!(buckets.quadruped.questions[0].score, 4);
        assert!(buckets.quadruped.interpretation.contains("avoid quadruped"));

        assert!(buckets.lying.questions.is_empty());
    }
}
