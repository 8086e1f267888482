//! Validation utilities

use crate::types::*;

/// Validate an entity identifier (account, unit, statement line,
/// transaction); `field` names it in the error message
pub fn validate_entity_id(value: &str, field: &str) -> ReconResult<()> {
    if value.trim().is_empty() {
        return Err(ReconciliationError::Validation(format!(
            "{field} cannot be empty"
        )));
    }

    if value.len() > 50 {
        return Err(ReconciliationError::Validation(format!(
            "{field} cannot exceed 50 characters"
        )));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ReconciliationError::Validation(format!(
            "{field} can only contain alphanumeric characters, dashes, and underscores"
        )));
    }

    Ok(())
}

/// Validate a free-form note before persisting it on a match
pub fn validate_notes(notes: &str) -> ReconResult<()> {
    if notes.len() > 500 {
        return Err(ReconciliationError::Validation(
            "Notes cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}
