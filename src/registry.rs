//! Registry of locale files known to the checker.
//!
//! The registry maps symbolic names (`english`, `devise_spanish`) to files
//! below one locales directory. It is built once from [`ParitySettings`]
//! and never mutated; comparisons and the registry-vs-disk audit both go
//! through it.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;
use serde::Serialize;
use thiserror::Error;

use crate::config::{
    LocaleFileMatcher,
    MatcherError,
    ParitySettings,
    normalize_locale_path,
};
use crate::input::locale::{
    LocaleError,
    LocaleFile,
    LocaleTree,
    comparable_trees,
    load_locale_file,
};
use crate::parity::{
    DiscrepancyKind,
    compare_trees,
    find_discrepancies,
};
use crate::types::KeyPath;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("Locale '{name}' is registered but {} does not exist", .path.display())]
    MissingFile { name: String, path: PathBuf },

    #[error("Locales directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to load locale '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: LocaleError,
    },

    #[error(transparent)]
    Pattern(#[from] MatcherError),
}

/// Result of matching the registry against the files on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryAudit {
    /// Locale files on disk that no registry entry points at.
    pub unregistered: BTreeSet<PathBuf>,
    /// Registered paths with no file on disk.
    pub missing: BTreeSet<PathBuf>,
}

impl RegistryAudit {
    /// True when the disk set and the registry set are equal.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.unregistered.is_empty() && self.missing.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales_dir: PathBuf,
    /// Name to path relative to `locales_dir`.
    files: BTreeMap<String, PathBuf>,
    matcher: LocaleFileMatcher,
    unwrap_language_root: bool,
}

impl LocaleRegistry {
    /// Builds the registry for a project rooted at `project_root`.
    ///
    /// # Errors
    /// Returns error if the configured file patterns are invalid.
    pub fn from_settings(
        project_root: &Path,
        settings: &ParitySettings,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            locales_dir: project_root.join(&settings.locales_dir),
            files: settings
                .files
                .iter()
                .map(|(name, path)| (name.clone(), normalize_locale_path(path)))
                .collect(),
            matcher: LocaleFileMatcher::new(settings)?,
            unwrap_language_root: settings.unwrap_language_root,
        })
    }

    #[must_use]
    pub fn locales_dir(&self) -> &Path {
        &self.locales_dir
    }

    /// Registered names and their paths relative to [`Self::locales_dir`].
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, PathBuf> {
        &self.files
    }

    /// Resolves a registered name to an absolute path.
    ///
    /// # Errors
    /// Returns error if `name` is not registered.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, RegistryError> {
        self.files
            .get(name)
            .map(|relative| self.locales_dir.join(relative))
            .ok_or_else(|| RegistryError::UnknownLocale(name.to_string()))
    }

    /// Loads the locale registered as `name`.
    ///
    /// # Errors
    /// Returns error if `name` is not registered, its file is missing, or
    /// the file fails to parse.
    pub fn load(&self, name: &str) -> Result<LocaleFile, RegistryError> {
        let path = self.path_of(name)?;
        if !path.is_file() {
            return Err(RegistryError::MissingFile { name: name.to_string(), path });
        }

        load_locale_file(&path)
            .map_err(|source| RegistryError::Load { name: name.to_string(), source })
    }

    /// Key paths of `baseline` that are missing or shaped differently in `target`.
    ///
    /// # Errors
    /// Returns error if either locale cannot be loaded.
    pub fn compare(
        &self,
        baseline: &str,
        target: &str,
    ) -> Result<BTreeSet<KeyPath>, RegistryError> {
        let (baseline_tree, target_tree) = self.load_pair(baseline, target)?;
        Ok(compare_trees(&baseline_tree, &target_tree))
    }

    /// Like [`Self::compare`], with the kind of each discrepancy.
    ///
    /// # Errors
    /// Returns error if either locale cannot be loaded.
    pub fn discrepancies(
        &self,
        baseline: &str,
        target: &str,
    ) -> Result<BTreeMap<KeyPath, DiscrepancyKind>, RegistryError> {
        let (baseline_tree, target_tree) = self.load_pair(baseline, target)?;
        Ok(find_discrepancies(&baseline_tree, &target_tree))
    }

    /// Loads both locales and returns the trees to compare.
    ///
    /// Language roots are stripped only when both files carry one that
    /// matches their file name.
    ///
    /// # Errors
    /// Returns error if either locale cannot be loaded.
    pub fn load_pair(
        &self,
        baseline: &str,
        target: &str,
    ) -> Result<(LocaleTree, LocaleTree), RegistryError> {
        tracing::debug!(baseline, target, "Comparing locales");
        let baseline_file = self.load(baseline)?;
        let target_file = self.load(target)?;
        Ok(comparable_trees(baseline_file, target_file, self.unwrap_language_root))
    }

    /// Locale files under the locales directory, relative to it.
    ///
    /// # Errors
    /// Returns error if the locales directory does not exist.
    pub fn files_on_disk(&self) -> Result<BTreeSet<PathBuf>, RegistryError> {
        if !self.locales_dir.is_dir() {
            return Err(RegistryError::MissingDirectory(self.locales_dir.clone()));
        }

        let mut found_files = BTreeSet::new();
        for result in WalkBuilder::new(&self.locales_dir)
            .standard_filters(false)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let Ok(relative_path) = entry.path().strip_prefix(&self.locales_dir) else {
                continue;
            };
            if self.matcher.is_locale_file(relative_path) {
                found_files.insert(relative_path.to_path_buf());
            }
        }

        Ok(found_files)
    }

    /// Compares the registry against the locale files on disk.
    ///
    /// # Errors
    /// Returns error if the locales directory does not exist.
    pub fn audit(&self) -> Result<RegistryAudit, RegistryError> {
        let on_disk = self.files_on_disk()?;
        let registered: BTreeSet<PathBuf> = self.files.values().cloned().collect();

        let audit = RegistryAudit {
            unregistered: on_disk.difference(&registered).cloned().collect(),
            missing: registered.difference(&on_disk).cloned().collect(),
        };
        tracing::debug!(
            unregistered = audit.unregistered.len(),
            missing = audit.missing.len(),
            "Audited locale registry"
        );

        Ok(audit)
    }
}
