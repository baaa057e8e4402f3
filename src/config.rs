//! Project configuration for locale parity checks.

/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Locale file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    LocaleFileMatcher,
    MatcherError,
};
pub(crate) use types::normalize_locale_path;
pub use types::{
    ComparisonConfig,
    ConfigError,
    ParitySettings,
    ValidationError,
};
