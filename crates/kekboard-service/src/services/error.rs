//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use kekboard_common::AppError;
use kekboard_core::{ChatError, DomainError};
use kekboard_store::StoreError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error
    App(AppError),

    /// Chat platform call failed
    Chat(ChatError),

    /// Embedded store failure
    Store(StoreError),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Chat(e) => write!(f, "Chat platform error: {e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            Self::Chat(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if the error means the target no longer exists
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_not_found(),
            Self::Chat(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::Chat(e) => {
                if e.is_not_found() {
                    404
                } else {
                    502
                }
            }
            Self::Store(_) | Self::Internal(_) => 500,
            Self::Validation(_) => 400,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Chat(ChatError::NotFound(_)) => "CHAT_NOT_FOUND",
            Self::Chat(ChatError::Transport(_)) => "CHAT_TRANSPORT_ERROR",
            Self::Store(StoreError::CorruptState { .. }) => "CORRUPT_STATE",
            Self::Store(_) => "STORAGE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ChatError> for ServiceError {
    fn from(err: ChatError) -> Self {
        Self::Chat(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {err}"))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Chat(e) => AppError::ExternalService(e.to_string()),
            ServiceError::Store(e) => AppError::Storage(e.to_string()),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
