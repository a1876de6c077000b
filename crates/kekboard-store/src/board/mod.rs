//! Per-message board state persistence

mod board_state_store;

pub use board_state_store::{BoardStateStore, MESSAGE_PREFIX};
