// src/constants.rs

/// Maximum accepted length for a string/path command parameter.
/// Longer input is a parse failure, never a silent truncation.
pub const MAX_STRSIZE: usize = 512;

/// Default port for active-mode data connections until PORT overrides it.
pub const DEFAULT_DATA_PORT: u16 = 20;

/// Cutoff after which LIST prints the year instead of HH:MM,
/// counted as six 30-day months.
pub const LIST_YEAR_CUTOFF_SECS: i64 = 6 * 30 * 24 * 60 * 60;
