//! Threshold decisions - pure mapping from live counts to board actions

mod threshold;

pub use threshold::{decide, BoardAction, ThresholdPolicy};
