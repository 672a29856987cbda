//! Fortification mode validation.

use crate::domain::error::ReconfigureError;

/// Modes every application accepts regardless of type.
pub const DEFAULT_MODES: &[&str] = &["reset", "learn", "write"];

/// Mode applied when `fortify` is requested without one.
pub const DEFAULT_FORTIFICATION: &str = "max";

/// Accept `mode` if it is a default mode or one the type declares.
///
/// # Errors
///
/// Returns [`ReconfigureError::Invalid`] naming the mode otherwise.
pub fn validate_mode(mode: &str, declared: &[String]) -> Result<(), ReconfigureError> {
    if DEFAULT_MODES.contains(&mode) || declared.iter().any(|m| m == mode) {
        return Ok(());
    }
    Err(ReconfigureError::invalid(
        "fortify",
        format!("Unknown fortification mode {mode}"),
    ))
}
