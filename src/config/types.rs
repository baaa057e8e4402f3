use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::path::{
    Component,
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use super::matcher::LocaleFileMatcher;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "comparisons[0].targets[1]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParitySettings {
    /// Directory holding the locale files, relative to the project root.
    pub locales_dir: String,

    /// Registry of symbolic locale names (`english`, `devise_spanish`)
    /// to file paths relative to `locales_dir`.
    pub files: BTreeMap<String, String>,

    pub comparisons: Vec<ComparisonConfig>,

    /// Patterns selecting locale files on disk, relative to `locales_dir`.
    /// `*` does not cross directories; use `**` to recurse.
    pub file_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    /// Strip the language root keys (`en:` / `es:`) of a compared pair when
    /// both files have one matching their file name.
    pub unwrap_language_root: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonConfig {
    pub baseline: String,
    pub targets: Vec<String>,
}

impl ParitySettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Registered path not covered by the file patterns
    /// - Comparison refers to an unregistered locale
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locales_dir.is_empty() {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Example: \"config/locales\"",
            ));
        }

        let mut seen_paths = BTreeSet::new();
        for (name, path) in &self.files {
            if name.is_empty() {
                errors.push(ValidationError::new("files", "Locale names cannot be empty"));
            }
            if path.is_empty() {
                errors.push(ValidationError::new(
                    format!("files.{name}"),
                    "The path cannot be empty. Example: \"en.yml\"",
                ));
            } else if !seen_paths.insert(normalize_locale_path(path)) {
                errors.push(ValidationError::new(
                    format!("files.{name}"),
                    format!("The path '{path}' is registered more than once"),
                ));
            }
        }

        if self.file_patterns.is_empty() {
            errors.push(ValidationError::new(
                "filePatterns",
                "At least one pattern is required. Example: [\"*.yml\"]",
            ));
        }

        for (index, pattern) in self.file_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("filePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        let patterns_valid = !self.file_patterns.is_empty() && errors.iter().all(|error| {
            !error.field_path.starts_with("filePatterns")
                && !error.field_path.starts_with("excludePatterns")
        });
        if patterns_valid && let Ok(matcher) = LocaleFileMatcher::new(self) {
            for (name, path) in &self.files {
                if !path.is_empty() && !matcher.is_locale_file(&normalize_locale_path(path)) {
                    errors.push(ValidationError::new(
                        format!("files.{name}"),
                        format!(
                            "The path '{path}' is not matched by filePatterns or is excluded. \
                             Example: use \"**/*.yml\" for nested directories"
                        ),
                    ));
                }
            }
        }

        for (index, comparison) in self.comparisons.iter().enumerate() {
            if !self.files.contains_key(&comparison.baseline) {
                errors.push(ValidationError::new(
                    format!("comparisons[{index}].baseline"),
                    format!("Unknown locale '{}'. Register it under 'files'", comparison.baseline),
                ));
            }

            if comparison.targets.is_empty() {
                errors.push(ValidationError::new(
                    format!("comparisons[{index}].targets"),
                    "At least one target locale is required",
                ));
            }

            for (target_index, target) in comparison.targets.iter().enumerate() {
                if !self.files.contains_key(target) {
                    errors.push(ValidationError::new(
                        format!("comparisons[{index}].targets[{target_index}]"),
                        format!("Unknown locale '{target}'. Register it under 'files'"),
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Drops `.` components so `./en.yml` and `en.yml` name the same file.
pub(crate) fn normalize_locale_path(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

impl Default for ParitySettings {
    fn default() -> Self {
        Self {
            locales_dir: "config/locales".to_string(),
            files: BTreeMap::new(),
            comparisons: Vec::new(),
            file_patterns: vec!["*.yml".to_string(), "*.yaml".to_string(), "*.json".to_string()],
            exclude_patterns: Vec::new(),
            unwrap_language_root: true,
        }
    }
}
