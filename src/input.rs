//! Input data loaded from disk.

pub mod locale;
