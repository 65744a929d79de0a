//! Utility functions for string comparison and formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{age_display, capitalize_first, contains_ignore_case, eq_ignore_case, truncate_string};
