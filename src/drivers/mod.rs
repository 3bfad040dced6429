//! OpenAI chat-completions wire format.
//!
//! The driver is the only place that knows the JSON shape of requests and
//! responses; everything above it works with [`ChatInput`] and [`ChatOutput`].
//! It covers OpenAI itself and the many servers that mimic its API
//! (vLLM, Ollama, LM Studio, DeepSeek, ...).

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, ErrorContext};
use crate::types::{ChatInput, ChatMessage, ChatOutput, Choice, Role, Usage};
use crate::Result;

/// Inclusive temperature range accepted by OpenAI-compatible endpoints.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    #[serde(default)]
    index: Option<u32>,
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default = "assistant_role")]
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

fn assistant_role() -> Role {
    Role::Assistant
}

/// OpenAI-compatible driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiDriver;

impl OpenAiDriver {
    pub fn new() -> Self {
        Self
    }

    /// Validate generation parameters and serialize the request body.
    pub fn build_request(&self, input: &ChatInput) -> Result<Value> {
        if input.messages.is_empty() {
            return Err(Error::validation_with_context(
                "chat input must contain at least one message",
                ErrorContext::new()
                    .with_field_path("input.messages")
                    .with_source("openai_driver"),
            ));
        }
        if !input.temperature.is_finite() || !TEMPERATURE_RANGE.contains(&input.temperature) {
            return Err(Error::validation_with_context(
                "temperature must be a finite number between 0 and 2",
                ErrorContext::new()
                    .with_field_path("input.temperature")
                    .with_details(format!("got {}", input.temperature))
                    .with_source("openai_driver"),
            ));
        }
        Ok(serde_json::to_value(input)?)
    }

    /// Parse a non-streaming response. Choices keep the order the server ranked them in.
    pub fn parse_response(&self, body: &Value) -> Result<ChatOutput> {
        let wire: WireResponse = serde_json::from_value(body.clone())?;

        let choices = wire
            .choices
            .into_iter()
            .enumerate()
            .map(|(pos, c)| {
                let message = ChatMessage {
                    role: c.message.role,
                    content: c.message.content.unwrap_or_default(),
                };
                let choice = Choice::new(c.index.unwrap_or(pos as u32), message);
                match c.finish_reason {
                    Some(reason) => choice.with_finish_reason(reason),
                    None => choice,
                }
            })
            .collect::<Vec<_>>();

        let mut output = ChatOutput::new(choices)?;
        let role = output.first().message.role;
        if role != Role::Assistant {
            return Err(Error::EmptyCompletion(format!(
                "first choice carries a {role:?} message, expected an assistant reply"
            )));
        }
        output.id = wire.id;
        output.model = wire.model;
        output.usage = wire.usage;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ChatInput {
        ChatInput::new(
            "gpt-4o-mini",
            vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
        )
    }

    #[test]
    fn test_build_request_body() {
        let mut input = input();
        input.temperature = 0.3;
        input.max_tokens = Some(1000);
        let body = OpenAiDriver::new().build_request(&input).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ],
                "temperature": 0.3,
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_build_request_rejects_bad_temperature() {
        for t in [-0.1, 2.5, f64::NAN, f64::INFINITY] {
            let mut input = input();
            input.temperature = t;
            let err = OpenAiDriver::new().build_request(&input).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "temperature {t}");
        }
    }

    #[test]
    fn test_build_request_rejects_empty_messages() {
        let input = ChatInput::new("gpt-4o-mini", vec![]);
        assert!(OpenAiDriver::new().build_request(&input).is_err());
    }

    #[test]
    fn test_parse_response() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "A -> r -> B"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "X -> r -> Y"}, "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let out = OpenAiDriver::new().parse_response(&body).unwrap();
        assert_eq!(out.id.as_deref(), Some("chatcmpl-1"));
        assert_eq!(out.first().message.role, Role::Assistant);
        assert_eq!(out.first().message.content, "A -> r -> B");
        assert_eq!(out.first().finish_reason.as_deref(), Some("stop"));
        assert_eq!(out.choices()[1].index, 1);
        assert_eq!(out.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        });
        let out = OpenAiDriver::new().parse_response(&body).unwrap();
        assert_eq!(out.first().message.content, "");
    }

    #[test]
    fn test_no_choices_is_empty_completion() {
        let body = serde_json::json!({"choices": []});
        let err = OpenAiDriver::new().parse_response(&body).unwrap_err();
        assert!(matches!(err, Error::EmptyCompletion(_)));

        let err = OpenAiDriver::new()
            .parse_response(&serde_json::json!({"object": "chat.completion"}))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCompletion(_)));
    }

    #[test]
    fn test_non_assistant_first_choice_rejected() {
        let body = serde_json::json!({
            "choices": [
                {"index": 0, "message": {"role": "user", "content": "echoed prompt"}},
                {"index": 1, "message": {"role": "assistant", "content": "A -> r -> B"}}
            ]
        });
        let err = OpenAiDriver::new().parse_response(&body).unwrap_err();
        assert!(matches!(err, Error::EmptyCompletion(_)));

        let body = serde_json::json!({
            "choices": [{"message": {"role": "system", "content": "sys"}}]
        });
        assert!(OpenAiDriver::new().parse_response(&body).is_err());
    }

    #[test]
    fn test_missing_role_defaults_to_assistant() {
        let body = serde_json::json!({"choices": [{"message": {"content": "A -> r -> B"}}]});
        let out = OpenAiDriver::new().parse_response(&body).unwrap();
        assert_eq!(out.first().message.content, "A -> r -> B");
    }
}
