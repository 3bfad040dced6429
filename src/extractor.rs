//! Knowledge-graph extraction over a chat model.
//!
//! The extractor sends the source text to the `"text-generator"` model with a
//! fixed system prompt asking for `ENTITY1 -> RELATIONSHIP -> ENTITY2` lines,
//! and returns the first completion untouched.

use crate::client::ChatModel;
use crate::registry::ModelRegistry;
use crate::types::ChatMessage;
use crate::Result;

/// Logical model name resolved through the registry.
pub const MODEL_NAME: &str = "text-generator";

/// System prompt defining the output format. Downstream consumers depend on it.
pub const SYSTEM_PROMPT: &str = "You are a knowledge graph extraction system. Analyze the provided text and:
1. Identify key entities (people, organizations, concepts, etc.)
2. Extract relationships between these entities
3. Format the output as a structured list of relationships in the format:
   ENTITY1 -> RELATIONSHIP -> ENTITY2";

/// Sampling temperature sent with every extraction request.
pub const TEMPERATURE: f64 = 0.3;

/// Upper bound on completion tokens requested from the model.
pub const MAX_TOKENS: u32 = 1000;

/// Extract a triples listing from `text`.
///
/// Errors from resolution, input construction and invocation are returned as-is.
/// The model's reply is not validated against the triple format.
pub async fn extract_knowledge_graph<R>(registry: &R, text: &str) -> Result<String>
where
    R: ModelRegistry + ?Sized,
{
    let model = registry.get_model(MODEL_NAME)?;

    let mut input = model.create_input(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(text),
    ])?;
    input.temperature = TEMPERATURE;
    input.max_tokens = Some(MAX_TOKENS);

    tracing::info!(model = MODEL_NAME, bytes = text.len(), "extracting knowledge graph");
    let output = model.invoke(input).await?;
    let choices = output.choices().len();

    let content = output.into_first_content();
    tracing::info!(choices, bytes = content.len(), "extraction complete");
    Ok(content)
}
