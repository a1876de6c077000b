//! Traits (ports) - capabilities the domain needs from the outside world

mod chat_client;

pub use chat_client::{ChatClient, ChatResult};
