//! Chat request and response types

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use crate::{Error, Result};

/// Default sampling temperature used by OpenAI-compatible endpoints.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// A chat-completions request body.
///
/// Built by [`crate::client::ChatModel::create_input`]; callers only adjust
/// the generation parameters before invoking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatInput {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatInput {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn new(index: u32, message: ChatMessage) -> Self {
        Self {
            index,
            message,
            finish_reason: None,
        }
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// A chat-completions response. Always holds at least one choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutput {
    pub id: Option<String>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
    choices: Vec<Choice>,
}

impl ChatOutput {
    /// Wrap ranked choices; an empty list is an [`Error::EmptyCompletion`].
    pub fn new(choices: Vec<Choice>) -> Result<Self> {
        if choices.is_empty() {
            return Err(Error::EmptyCompletion(
                "response contained no choices".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            model: None,
            usage: None,
            choices,
        })
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// The canonical (index 0) choice.
    pub fn first(&self) -> &Choice {
        &self.choices[0]
    }

    /// Consume the output, returning the first choice's content.
    pub fn into_first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default()
    }
}
