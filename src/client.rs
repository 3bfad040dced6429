//! Chat-model handles.
//!
//! [`ChatModel`] is the capability set a resolved model offers: package
//! messages into a request, then invoke it and get ranked choices back.
//! [`crate::registry::ModelRegistry`] hands these out by logical name.

pub mod openai;

pub use openai::OpenAiChatModel;

use async_trait::async_trait;

use crate::types::{ChatInput, ChatMessage, ChatOutput};
use crate::Result;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Logical name this handle was resolved from.
    fn name(&self) -> &str;

    /// Package messages into a request for this model, preserving their order.
    fn create_input(&self, messages: Vec<ChatMessage>) -> Result<ChatInput>;

    /// Send one request and return the ranked choices.
    async fn invoke(&self, input: ChatInput) -> Result<ChatOutput>;
}
