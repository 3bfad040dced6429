use async_trait::async_trait;

use super::ChatModel;
use crate::drivers::OpenAiDriver;
use crate::error::{Error, ErrorContext};
use crate::transport::HttpTransport;
use crate::types::{ChatInput, ChatMessage, ChatOutput};
use crate::Result;

/// A chat model served by an OpenAI-compatible endpoint.
pub struct OpenAiChatModel {
    name: String,
    source_model: String,
    path: String,
    driver: OpenAiDriver,
    transport: HttpTransport,
}

impl OpenAiChatModel {
    pub fn new(
        name: impl Into<String>,
        source_model: impl Into<String>,
        path: impl Into<String>,
        transport: HttpTransport,
    ) -> Self {
        Self {
            name: name.into(),
            source_model: source_model.into(),
            path: path.into(),
            driver: OpenAiDriver::new(),
            transport,
        }
    }

    pub fn source_model(&self) -> &str {
        &self.source_model
    }

    pub fn endpoint(&self) -> String {
        self.transport.url_for(&self.path)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_input(&self, messages: Vec<ChatMessage>) -> Result<ChatInput> {
        if messages.is_empty() {
            return Err(Error::validation_with_context(
                "at least one message is required",
                ErrorContext::new()
                    .with_field_path("messages")
                    .with_source(self.name.clone()),
            ));
        }
        Ok(ChatInput::new(self.source_model.clone(), messages))
    }

    async fn invoke(&self, input: ChatInput) -> Result<ChatOutput> {
        let body = self.driver.build_request(&input)?;
        tracing::debug!(
            model = %self.name,
            source_model = %input.model,
            messages = input.messages.len(),
            temperature = input.temperature,
            max_tokens = ?input.max_tokens,
            "invoking chat model"
        );

        let response = self.transport.post_json(&self.path, &body).await?;
        let output = self.driver.parse_response(&response)?;

        if let Some(usage) = &output.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "chat model usage"
            );
        }
        Ok(output)
    }
}
