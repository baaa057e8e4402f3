//! locale-parity
//!
//! ロケールファイルの翻訳キーがベースラインと揃っているかを検査する

pub mod check;
pub mod config;
pub mod input;
pub mod parity;
pub mod registry;
pub mod types;

pub use check::{
    CheckOptions,
    CheckReport,
    check_project,
};
pub use parity::compare_trees;
pub use registry::LocaleRegistry;
pub use types::KeyPath;
