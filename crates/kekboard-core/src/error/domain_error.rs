//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Member not found in guild: {0}")]
    MemberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound(_) | Self::MemberNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}
