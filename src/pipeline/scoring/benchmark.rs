//! 30-second Sit-to-Stand normative benchmarks (Hong Kong older-adult norms).

use std::fmt;

use serde::Serialize;

use crate::models::enums::{BenchmarkPerformance, Gender};

/// Age bucket used for benchmark lookup. Ages under 60 fold into 60-64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "60-64")]
    From60To64,
    #[serde(rename = "65-69")]
    From65To69,
    #[serde(rename = "70-74")]
    From70To74,
    #[serde(rename = "75-79")]
    From75To79,
    #[serde(rename = "80-84")]
    From80To84,
    #[serde(rename = "85-89")]
    From85To89,
    #[serde(rename = "90+")]
    NinetyPlus,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::From60To64 => "60-64",
            Self::From65To69 => "65-69",
            Self::From70To74 => "70-74",
            Self::From75To79 => "75-79",
            Self::From80To84 => "80-84",
            Self::From85To89 => "85-89",
            Self::NinetyPlus => "90+",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repetition thresholds for one age/gender cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StsThresholds {
    /// At or below: Below Average.
    pub below: u32,
    pub average_min: u32,
    pub average_max: u32,
    /// At or above: Above Average.
    pub above: u32,
}

const fn t(below: u32, average_min: u32, average_max: u32, above: u32) -> StsThresholds {
    StsThresholds {
        below,
        average_min,
        average_max,
        above,
    }
}

/// Indexed by `AgeGroup` declaration order.
const MALE_THRESHOLDS: [StsThresholds; 7] = [
    t(11, 12, 16, 17),
    t(10, 11, 15, 16),
    t(9, 10, 13, 14),
    t(9, 10, 13, 14),
    t(9, 10, 13, 14),
    t(6, 7, 10, 11),
    t(4, 5, 7, 8),
];

const FEMALE_THRESHOLDS: [StsThresholds; 7] = [
    t(10, 11, 14, 15),
    t(9, 10, 13, 14),
    t(8, 9, 12, 13),
    t(7, 8, 11, 12),
    t(7, 8, 11, 12),
    t(7, 8, 9, 10),
    t(6, 7, 9, 10),
];

/// Used when gender is unknown.
pub const DEFAULT_THRESHOLDS: StsThresholds = t(10, 11, 14, 15);

/// Benchmark outcome attached to the profile's STS assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StsBenchmark {
    /// Average band, e.g. `"10 - 13"`.
    pub range: String,
    pub performance: BenchmarkPerformance,
}

pub fn age_group(age: u32) -> AgeGroup {
    match age {
        0..=64 => AgeGroup::From60To64,
        65..=69 => AgeGroup::From65To69,
        70..=74 => AgeGroup::From70To74,
        75..=79 => AgeGroup::From75To79,
        80..=84 => AgeGroup::From80To84,
        85..=89 => AgeGroup::From85To89,
        _ => AgeGroup::NinetyPlus,
    }
}

pub fn thresholds_for(age: u32, gender: Option<Gender>) -> StsThresholds {
    let group = age_group(age);
    match gender {
        Some(Gender::Male) => MALE_THRESHOLDS[group.index()],
        Some(Gender::Female) => FEMALE_THRESHOLDS[group.index()],
        None => DEFAULT_THRESHOLDS,
    }
}

/// Classify a repetition count against the age/gender norm.
/// Both thresholds are inclusive.
pub fn sts_benchmark(age: u32, gender: Option<Gender>, repetitions: u32) -> StsBenchmark {
    let thresholds = thresholds_for(age, gender);

    let performance = if repetitions <= thresholds.below {
        BenchmarkPerformance::BelowAverage
    } else if repetitions >= thresholds.above {
        BenchmarkPerformance::AboveAverage
    } else {
        BenchmarkPerformance::Average
    };

    StsBenchmark {
        range: format!("{} - {}", thresholds.average_min, thresholds.average_max),
        performance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn female_65_69_boundaries_are_inclusive() {
        let below = sts_benchmark(67, Some(Gender::Female), 9);
        assert_eq!(below.performance, BenchmarkPerformance::BelowAverage);

        let above = sts_benchmark(67, Some(Gender::Female), 14);
        assert_eq!(above.performance, BenchmarkPerformance::AboveAverage);

        let average = sts_benchmark(67, Some(Gender::Female), 10);
        assert_eq!(average.performance, BenchmarkPerformance::Average);
        assert_eq!(average.range, "10 - 13");
    }

    #[test]
    fn under_sixty_folds_into_first_bucket() {
        assert_eq!(age_group(45), AgeGroup::From60To64);
        assert_eq!(
            thresholds_for(45, Some(Gender::Male)),
            thresholds_for(62, Some(Gender::Male))
        );
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(age_group(64), AgeGroup::From60To64);
        assert_eq!(age_group(65), AgeGroup::From65To69);
        assert_eq!(age_group(89), AgeGroup::From85To89);
        assert_eq!(age_group(90), AgeGroup::NinetyPlus);
        assert_eq!(age_group(104), AgeGroup::NinetyPlus);
    }

    #[test]
    fn male_ninety_plus() {
        let result = sts_benchmark(93, Some(Gender::Male), 6);
        assert_eq!(result.range, "5 - 7");
        assert_eq!(result.performance, BenchmarkPerformance::Average);
    }

    #[test]
    fn unknown_gender_uses_default_thresholds() {
        let result = sts_benchmark(80, None, 15);
        assert_eq!(result.range, "11 - 14");
        assert_eq!(result.performance, BenchmarkPerformance::AboveAverage);
    }

    #[test]
    fn every_cell_is_ordered() {
        for cell in MALE_THRESHOLDS.iter().chain(FEMALE_THRESHOLDS.iter()) {
            assert!(cell.below < cell.average_min);
            assert!(cell.average_min <= cell.average_max);
            assert!(cell.average_max < cell.above);
        }
    }

    #[test]
    fn age_group_serialises_as_label() {
        assert_eq!(serde_json::to_string(&AgeGroup::NinetyPlus).unwrap(), "\"90+\"");
    }
}
