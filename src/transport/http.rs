use crate::error_code::StandardErrorCode;
use crate::manifest::ConnectionConfig;
use crate::transport::TransportError;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// One connection's worth of HTTP plumbing: base URL, credentials, headers.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(connection: &ConnectionConfig, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &connection.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::Other(format!("invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                TransportError::Other(format!("invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = connection.timeout_secs.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: connection.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// Exactly one request is sent. Non-2xx replies become [`Error::Remote`].
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url_for(path);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !status.is_success() {
            let (code, message) = decode_error_body(status.as_u16(), &text);
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                class = code.name(),
                category = code.category(),
                "chat request failed: {}",
                message
            );
            return Err(remote_error(status.as_u16(), code, message));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

pub(crate) fn remote_error(status: u16, code: StandardErrorCode, message: String) -> Error {
    Error::Remote {
        status,
        class: code.name().to_string(),
        message,
    }
}

/// Classify an error reply and pull out its message.
///
/// Understands the OpenAI shape `{"error": {"message", "type", "code"}}` as well as
/// `{"error": "..."}` and `{"message": "..."}`; anything else is reported verbatim.
pub(crate) fn decode_error_body(status: u16, body: &str) -> (StandardErrorCode, String) {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let error_obj = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error_obj
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(|m| m.as_str())
        })
        .map(String::from)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

    let provider_code = error_obj.and_then(|e| {
        e.get("code")
            .and_then(|c| c.as_str())
            .or_else(|| e.get("type").and_then(|t| t.as_str()))
    });

    (StandardErrorCode::classify(status, provider_code), message)
}
