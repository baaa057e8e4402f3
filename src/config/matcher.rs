//! File pattern matcher for locale files.

use std::path::Path;

use globset::{
    GlobBuilder,
    GlobSet,
    GlobSetBuilder,
};

use super::ParitySettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid locale file pattern '{pattern}': {source}")]
    InvalidFilePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches paths relative to the locales directory against the configured patterns.
#[derive(Debug, Clone)]
pub struct LocaleFileMatcher {
    file_set: GlobSet,
    exclude_set: GlobSet,
}

impl LocaleFileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(settings: &ParitySettings) -> Result<Self, MatcherError> {
        let file_set = Self::build_glob_set(&settings.file_patterns, |pattern, source| {
            MatcherError::InvalidFilePattern { pattern, source }
        })?;

        let exclude_set = Self::build_glob_set(&settings.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { file_set, exclude_set })
    }

    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            // `*.yml` stays in the locales directory, like a shell glob
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Returns true if the path matches `filePatterns` but not `excludePatterns`.
    ///
    /// The path must be relative to the locales directory.
    #[must_use]
    pub fn is_locale_file(&self, relative_path: &Path) -> bool {
        self.file_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
