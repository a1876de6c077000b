//! Gateway event handling

mod handler;

pub use handler::{gateway_intents, BoardEventHandler};
