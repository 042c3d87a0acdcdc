//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::HubError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &HubError) -> String {
    match e {
        HubError::Registry(inner) => format!("Course tree unavailable: {}", inner),
        HubError::UserBlocked(user) => format!("User '{}' is blocked and cannot spawn", user),
        other => other.to_string(),
    }
}

/// Serialize any result as pretty JSON.
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, HubError> {
    Ok(serde_json::to_string_pretty(value)?)
}
