pub mod client;
pub mod config;
pub mod conversation;
pub mod formatter;
pub mod message;
pub mod policy;
pub mod store;

// Re-export main types for convenience
pub use client::{ChatClient, ExchangeError, DEFAULT_BASE_URL};
pub use config::Config;
pub use conversation::Conversation;
pub use formatter::{format_reply, BULLET_MARKER};
pub use message::Message;
pub use policy::ErrorPolicy;
pub use store::{Action, ChatState, Effect, EXAMPLE_QUESTIONS};
