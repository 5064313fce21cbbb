//! Validation utilities for imported movements

use crate::types::*;

/// Validate that a movement identifier is usable
pub fn validate_transaction_id(id: &str) -> ReconcileResult<()> {
    if id.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "Movement ID cannot be empty".to_string(),
        ));
    }

    if id.len() > 64 {
        return Err(ReconcileError::Validation(
            "Movement ID cannot exceed 64 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an operation-type label is present
pub fn validate_operation_type(label: &str) -> ReconcileResult<()> {
    if label.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "Operation type cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate a relation key when one is given
pub fn validate_related_key(key: Option<&str>) -> ReconcileResult<()> {
    if let Some(key) = key {
        if key.chars().any(char::is_control) {
            return Err(ReconcileError::Validation(format!(
                "Relation key '{}' contains control characters",
                key.escape_debug()
            )));
        }
    }

    Ok(())
}

/// Validate a transaction built from an imported row
pub fn validate_transaction(transaction: &Transaction) -> ReconcileResult<()> {
    validate_transaction_id(&transaction.id)?;
    validate_operation_type(&transaction.operation_type)?;
    validate_related_key(transaction.related_key.as_deref())?;
    Ok(())
}
