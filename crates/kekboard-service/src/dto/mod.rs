//! Data transfer objects
//!
//! This module provides:
//! - Response DTOs for the HTTP surface
//! - The board copy mapper turning a source message into an outbound message

pub mod board_copy;
pub mod responses;

pub use board_copy::{message_url, BoardCopy, GALLERY_URL, MAX_IMAGE_EMBEDS};
pub use responses::{HealthChecks, HealthResponse, ReadinessResponse, StatsEntry};
