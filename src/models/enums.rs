use std::fmt;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is also the serde form, so stored rows, prompts and
/// generation schemas all share one spelling.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Every accepted string form, in declaration order.
            pub fn values() -> &'static [&'static str] {
                &[$($s),+]
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

str_enum!(ToeTouch {
    Can => "can",
    Cannot => "cannot",
    Other => "other",
});

str_enum!(SwayStatus {
    Present => "present",
    Absent => "absent",
});

str_enum!(BenchmarkPerformance {
    BelowAverage => "Below Average",
    Average => "Average",
    AboveAverage => "Above Average",
});

str_enum!(QuestionnaireSection {
    Symptoms => "symptoms",
    Stiffness => "stiffness",
    Pain => "pain",
    FunctionAdl => "function_ADL",
    FunctionSports => "function_sports",
    QualityOfLife => "quality_of_life",
});

str_enum!(MuscleRole {
    Primary => "P",
    Secondary => "N",
    Stabiliser => "S",
});

str_enum!(ProgressionKind {
    Regression => "regression",
    Progression => "progression",
});

str_enum!(RiskLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(SafetyVerdict {
    Safe => "safe",
    ModerateRisk => "moderate_risk",
    HighRisk => "high_risk",
});

str_enum!(ExerciseDecisionKind {
    Approved => "APPROVED",
    ApprovedWithModifications => "APPROVED WITH MODIFICATIONS",
    Rejected => "REJECTED",
});

/// Knee alignment observed during the STS test.
///
/// The assessment form allows free text beyond the three common findings,
/// so unknown values are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KneeAlignment {
    Valgus,
    Varus,
    Neutral,
    Other(String),
}

impl KneeAlignment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valgus => "valgus",
            Self::Varus => "varus",
            Self::Neutral => "neutral",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for KneeAlignment {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "valgus" => Self::Valgus,
            "varus" => Self::Varus,
            "neutral" => Self::Neutral,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<KneeAlignment> for String {
    fn from(alignment: KneeAlignment) -> Self {
        alignment.as_str().to_string()
    }
}

impl fmt::Display for KneeAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
