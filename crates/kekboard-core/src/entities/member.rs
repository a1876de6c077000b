//! Member entity - a user's identity within a guild

use crate::value_objects::Snowflake;

/// Guild member as resolved from the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: Snowflake,
    pub username: String,
    pub nick: Option<String>,
    pub avatar_url: Option<String>,
}

impl Member {
    /// Create a new Member without nickname or avatar
    pub fn new(user_id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            nick: None,
            avatar_url: None,
        }
    }

    /// Get display name (nickname if set, otherwise username)
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .filter(|nick| !nick.is_empty())
            .unwrap_or(&self.username)
    }
}
