//! Runs every configured comparison and the registry audit.

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use thiserror::Error;

use crate::config::{
    ComparisonConfig,
    ConfigError,
    ConfigManager,
};
use crate::parity::{
    DiscrepancyKind,
    extra_keys,
    find_discrepancies,
};
use crate::registry::{
    LocaleRegistry,
    RegistryAudit,
    RegistryError,
};
use crate::types::KeyPath;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Also list keys that only the target carries.
    pub report_extra: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub path: KeyPath,
    pub kind: DiscrepancyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub baseline: String,
    pub target: String,
    pub target_path: PathBuf,
    pub discrepancies: Vec<Discrepancy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_keys: Vec<KeyPath>,
}

impl ComparisonReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub comparisons: Vec<ComparisonReport>,
    pub audit: RegistryAudit,
}

impl CheckReport {
    /// True when every comparison has full parity and the registry matches the disk.
    ///
    /// Extra keys never make a report dirty.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.audit.is_consistent() && self.comparisons.iter().all(ComparisonReport::is_clean)
    }

    #[must_use]
    pub fn discrepancy_count(&self) -> usize {
        self.comparisons.iter().map(|comparison| comparison.discrepancies.len()).sum()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comparison in &self.comparisons {
            let status = if comparison.is_clean() { "ok" } else { "FAILED" };
            writeln!(f, "{} -> {}: {status}", comparison.baseline, comparison.target)?;
            for discrepancy in &comparison.discrepancies {
                writeln!(f, "  {} ({})", discrepancy.path, discrepancy.kind.describe())?;
            }
            for key in &comparison.extra_keys {
                writeln!(f, "  {key} (only in {})", comparison.target)?;
            }
        }

        for path in &self.audit.unregistered {
            writeln!(f, "unregistered locale file: {}", path.display())?;
        }
        for path in &self.audit.missing {
            writeln!(f, "registered locale file not found on disk: {}", path.display())?;
        }

        if self.is_clean() {
            write!(f, "All {} comparisons have full parity", self.comparisons.len())
        } else {
            write!(
                f,
                "{} discrepancies, {} unregistered files, {} missing files",
                self.discrepancy_count(),
                self.audit.unregistered.len(),
                self.audit.missing.len()
            )
        }
    }
}

/// Runs the configured comparisons in order, then audits the registry.
///
/// # Errors
/// Returns error if a registered locale cannot be loaded or the locales
/// directory is missing. Discrepancies are reported, not returned as errors.
pub fn run_checks(
    registry: &LocaleRegistry,
    configured: &[ComparisonConfig],
    options: CheckOptions,
) -> Result<CheckReport, RegistryError> {
    let mut comparisons = Vec::new();

    for comparison in configured {
        for target_name in &comparison.targets {
            let (baseline, target) = registry.load_pair(&comparison.baseline, target_name)?;

            let discrepancies = find_discrepancies(&baseline, &target)
                .into_iter()
                .map(|(path, kind)| Discrepancy { path, kind })
                .collect::<Vec<_>>();
            let extra = if options.report_extra {
                extra_keys(&baseline, &target).into_iter().collect()
            } else {
                Vec::new()
            };

            tracing::debug!(
                baseline = %comparison.baseline,
                target = %target_name,
                discrepancies = discrepancies.len(),
                "Compared locales"
            );

            comparisons.push(ComparisonReport {
                baseline: comparison.baseline.clone(),
                target: target_name.clone(),
                target_path: registry.path_of(target_name)?,
                discrepancies,
                extra_keys: extra,
            });
        }
    }

    let audit = registry.audit()?;

    Ok(CheckReport { comparisons, audit })
}

/// Loads the project configuration at `project_root` and runs every check.
///
/// # Errors
/// Returns error on invalid configuration or unloadable locales.
pub fn check_project(
    project_root: &Path,
    options: CheckOptions,
) -> Result<CheckReport, CheckError> {
    let mut manager = ConfigManager::new(project_root.to_path_buf());
    manager.load_settings()?;

    let registry = LocaleRegistry::from_settings(manager.project_root(), manager.get_settings())?;
    Ok(run_checks(&registry, &manager.get_settings().comparisons, options)?)
}
