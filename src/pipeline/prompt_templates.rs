//! System instruction templates for the two generation stages.
//!
//! Loaded once per process into an immutable `PromptTemplates` and shared
//! with both stages. The recommendation template carries exactly one
//! placeholder where the rendered biomechanical targets are spliced in.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Splice point in the recommendation template.
pub const TARGETS_PLACEHOLDER: &str = "{biomechanical_targets}";

pub const RECOMMENDATION_FILE: &str = "recommendation_system_prompt.md";
pub const VERIFICATION_FILE: &str = "verification_system_prompt.md";

const BUILTIN_RECOMMENDATION: &str =
    include_str!("../../resources/prompts/recommendation_system_prompt.md");
const BUILTIN_VERIFICATION: &str =
    include_str!("../../resources/prompts/verification_system_prompt.md");

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Cannot read prompt template {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Recommendation template must contain {{biomechanical_targets}} exactly once (found {found})")]
    Placeholder { found: usize },

    #[error("Prompt template {0} is empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    recommendation: String,
    verification: String,
}

impl PromptTemplates {
    /// Validate and wrap two instruction texts.
    pub fn new(recommendation: String, verification: String) -> Result<Self, TemplateError> {
        if recommendation.trim().is_empty() {
            return Err(TemplateError::Empty(RECOMMENDATION_FILE));
        }
        if verification.trim().is_empty() {
            return Err(TemplateError::Empty(VERIFICATION_FILE));
        }
        let found = recommendation.matches(TARGETS_PLACEHOLDER).count();
        if found != 1 {
            return Err(TemplateError::Placeholder { found });
        }

        Ok(Self {
            recommendation,
            verification,
        })
    }

    /// Templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            recommendation: BUILTIN_RECOMMENDATION.to_string(),
            verification: BUILTIN_VERIFICATION.to_string(),
        }
    }

    /// Read both templates from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| TemplateError::Unreadable { path, source })
        };
        let templates = Self::new(read(RECOMMENDATION_FILE)?, read(VERIFICATION_FILE)?)?;
        tracing::info!(dir = %dir.display(), "Loaded prompt templates");
        Ok(templates)
    }

    /// `load_from_dir` when a directory is configured, built-ins otherwise.
    pub fn load(dir: Option<&Path>) -> Result<Self, TemplateError> {
        match dir {
            Some(dir) => Self::load_from_dir(dir),
            None => Ok(Self::builtin()),
        }
    }

    /// Recommendation instruction with the rendered targets spliced in.
    pub fn recommendation_instruction(&self, rendered_targets: &str) -> String {
        self.recommendation
            .replacen(TARGETS_PLACEHOLDER, rendered_targets, 1)
    }

    pub fn verification_instruction(&self) -> &str {
        &self.verification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_are_valid() {
        let builtin = PromptTemplates::builtin();
        let validated =
            PromptTemplates::new(builtin.recommendation.clone(), builtin.verification.clone())
                .unwrap();
        assert_eq!(validated, builtin);
    }

    #[test]
    fn builtin_verification_describes_soft_start() {
        let text = PromptTemplates::builtin().verification_instruction().to_string();
        assert!(text.contains("soft start"));
        assert!(text.contains("Weight-bearing check"));
        assert!(text.contains("Kneeling check"));
        assert!(text.contains("Core-stability check"));
    }

    #[test]
    fn splice_replaces_placeholder_only() {
        let templates =
            PromptTemplates::new("Before\n{biomechanical_targets}\nAfter".into(), "v".into())
                .unwrap();
        let spliced = templates.recommendation_instruction("1. Issue: X");
        assert_eq!(spliced, "Before\n1. Issue: X\nAfter");
        assert!(!spliced.contains(TARGETS_PLACEHOLDER));
    }

    #[test]
    fn missing_or_duplicate_placeholder_rejected() {
        let err = PromptTemplates::new("no splice point".into(), "v".into()).unwrap_err();
        assert!(matches!(err, TemplateError::Placeholder { found: 0 }));

        let twice = format!("{TARGETS_PLACEHOLDER} {TARGETS_PLACEHOLDER}");
        let err = PromptTemplates::new(twice, "v".into()).unwrap_err();
        assert!(matches!(err, TemplateError::Placeholder { found: 2 }));
    }

    #[test]
    fn empty_verification_rejected() {
        let err = PromptTemplates::new(TARGETS_PLACEHOLDER.into(), "  ".into()).unwrap_err();
        assert!(matches!(err, TemplateError::Empty(VERIFICATION_FILE)));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(RECOMMENDATION_FILE),
            "Custom\n{biomechanical_targets}",
        )
        .unwrap();
        fs::write(dir.path().join(VERIFICATION_FILE), "Custom verification").unwrap();

        let templates = PromptTemplates::load(Some(dir.path())).unwrap();
        assert_eq!(templates.verification_instruction(), "Custom verification");
        assert_eq!(templates.recommendation_instruction("T"), "Custom\nT");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = PromptTemplates::load_from_dir(dir.path()).unwrap_err();
        match err {
            TemplateError::Unreadable { path, .. } => {
                assert!(path.ends_with(RECOMMENDATION_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_directory_means_builtin() {
        assert_eq!(PromptTemplates::load(None).unwrap(), PromptTemplates::builtin());
    }
}
