//! Validation helper functions for configuration types.

use globset::Glob;

use crate::core::errors::{MentorError, Result};

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(MentorError::validation_field(
            format!("{field} must be greater than 0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that a u64 value is greater than zero.
pub fn validate_positive_u64(value: u64, field: &str) -> Result<()> {
    if value == 0 {
        return Err(MentorError::validation_field(
            format!("{field} must be greater than 0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that a usize value lies in `min..=max`.
pub fn validate_usize_range(value: usize, min: usize, max: usize, field: &str) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(MentorError::validation_field(
            format!("{field} must be between {min} and {max}, got {value}"),
            field,
        ));
    }
    Ok(())
}

/// Validate that every pattern compiles as a glob.
pub fn validate_glob_patterns(patterns: &[String], field: &str) -> Result<()> {
    for pattern in patterns {
        Glob::new(pattern).map_err(|e| {
            MentorError::config_field(format!("Invalid glob pattern '{pattern}': {e}"), field)
        })?;
    }
    Ok(())
}
