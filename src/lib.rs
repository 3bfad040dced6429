//! # kg-extract
//!
//! Knowledge-graph extraction over an OpenAI-compatible chat model.
//!
//! A source document is sent to the logical model `"text-generator"` together
//! with a fixed system prompt; the model's first completion, a listing of
//! `ENTITY1 -> RELATIONSHIP -> ENTITY2` lines, is returned as-is.
//!
//! ```rust,no_run
//! use kg_extract::{extract_knowledge_graph, ManifestLoader, ManifestRegistry};
//!
//! #[tokio::main]
//! async fn main() -> kg_extract::Result<()> {
//!     let manifest = ManifestLoader::new().load().await?;
//!     let registry = ManifestRegistry::new(manifest);
//!
//!     let triples = extract_knowledge_graph(&registry, "Alice works at Acme.").await?;
//!     println!("{triples}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`extractor`] | Prompt, generation parameters and the extraction call |
//! | [`registry`] | Logical model name → chat-model handle |
//! | [`client`] | The [`ChatModel`] capability and its OpenAI-compatible handle |
//! | [`drivers`] | Chat-completions request/response wire format |
//! | [`transport`] | HTTP transport |
//! | [`manifest`] | Model and connection configuration |
//! | [`collector`] | Same-site page crawler producing source text |
//! | [`types`] | Messages, chat input and output |

pub mod client;
pub mod collector;
pub mod drivers;
pub mod error;
pub mod error_code;
pub mod extractor;
pub mod logging;
pub mod manifest;
pub mod registry;
pub mod transport;
pub mod types;

pub use client::{ChatModel, OpenAiChatModel};
pub use error::{Error, ErrorContext};
pub use extractor::{extract_knowledge_graph, MAX_TOKENS, MODEL_NAME, SYSTEM_PROMPT, TEMPERATURE};
pub use manifest::{ManifestLoader, ModelManifest};
pub use registry::{ManifestRegistry, ModelRegistry};
pub use types::{ChatInput, ChatMessage, ChatOutput, Choice, Role};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
