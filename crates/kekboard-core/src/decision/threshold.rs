//! Threshold decision engine
//!
//! Maps the live matching-reaction count of a message and its stored board
//! state to the single action that brings the board back in line. No I/O
//! happens here; the count is always recomputed from the full reaction list
//! of the freshly fetched message, so replaying events in any order converges.

use std::fmt;

use crate::entities::{MessageBoardState, ReactionCount};
use crate::error::DomainError;

/// Action required to reconcile the board with a message's live reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardAction {
    /// Board already reflects the message
    NoAction,
    /// Message crossed the threshold and has no board copy yet
    Publish,
    /// Message is on the board but its count changed
    Update,
    /// Message dropped below the threshold
    Retract,
}

impl BoardAction {
    /// Check if the action mutates board state
    #[inline]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::NoAction)
    }
}

impl fmt::Display for BoardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAction => write!(f, "no_action"),
            Self::Publish => write!(f, "publish"),
            Self::Update => write!(f, "update"),
            Self::Retract => write!(f, "retract"),
        }
    }
}

/// Decide the board action for a live count against the stored count
///
/// `stored_count` is `None` when the message is not tracked.
pub fn decide(count: u64, threshold: u64, stored_count: Option<u64>) -> BoardAction {
    let qualifies = count >= threshold;

    match (qualifies, stored_count) {
        (true, None) => BoardAction::Publish,
        (true, Some(stored)) if stored != count => BoardAction::Update,
        (true, Some(_)) | (false, None) => BoardAction::NoAction,
        (false, Some(_)) => BoardAction::Retract,
    }
}

/// Threshold and target reaction configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdPolicy {
    threshold: u64,
    target: String,
}

impl ThresholdPolicy {
    /// Create a policy; the target substring is matched case-insensitively
    pub fn new(threshold: u64, target: impl AsRef<str>) -> Result<Self, DomainError> {
        if threshold == 0 {
            return Err(DomainError::ValidationError(
                "reaction threshold must be at least 1".to_string(),
            ));
        }

        let target = target.as_ref().trim().to_lowercase();
        if target.is_empty() {
            return Err(DomainError::ValidationError(
                "target reaction name must not be empty".to_string(),
            ));
        }

        Ok(Self { threshold, target })
    }

    /// Minimum count for a message to be on the board
    #[inline]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Lower-cased target substring
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Check if a reaction name counts toward the board
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.target)
    }

    /// Sum counts across all matching reactions
    pub fn matching_count(&self, reactions: &[ReactionCount]) -> u64 {
        reactions
            .iter()
            .filter(|r| self.matches(&r.name))
            .map(|r| r.count)
            .sum()
    }

    /// Check if a count is high enough to be on the board
    #[inline]
    pub fn qualifies(&self, count: u64) -> bool {
        count >= self.threshold
    }

    /// Decide the action for a live count and the stored state, if any
    pub fn decide(&self, count: u64, existing: Option<&MessageBoardState>) -> BoardAction {
        decide(count, self.threshold, existing.map(|s| s.reaction_count))
    }
}
