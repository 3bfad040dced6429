//! Core data types exchanged with a chat model.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatMessage`] | Role-tagged message |
//! | [`ChatInput`] | Request: ordered messages plus generation parameters |
//! | [`ChatOutput`] | Response: one or more ranked [`Choice`]s |
//!
//! ```rust
//! use kg_extract::types::{ChatMessage, Role};
//!
//! let system = ChatMessage::system("You are a helpful assistant");
//! let user = ChatMessage::user("What's the weather?");
//! assert_eq!(system.role, Role::System);
//! assert_eq!(user.content, "What's the weather?");
//! ```

pub mod chat;
pub mod message;

pub use chat::{ChatInput, ChatOutput, Choice, Usage};
pub use message::{ChatMessage, Role};
