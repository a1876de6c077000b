//! Chat platform errors - failures reported by the capability interface

use thiserror::Error;

/// Failure of a call to the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Message, member, or channel does not exist or is not visible
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, permission, rate limit, or any other platform failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ChatError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Check if this is a "not found" error
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
