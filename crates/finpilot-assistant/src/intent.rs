//! Intent classification: one model call turning free text into a plan.
//!
//! The model's JSON is untrusted. Every field is recovered independently;
//! anything missing, mistyped, or unparseable degrades to the documented
//! fallback rather than failing the turn.

use std::sync::Arc;

use tracing::{debug, warn};

use finpilot_core::{IntentDescriptor, IntentEntities};
use finpilot_llm::json::{string_array, string_field};
use finpilot_llm::{extract_json, ChatMessage, ChatModel, CompletionRequest};

use crate::registry::KNOWN_TOOL_NAMES;

const CLASSIFY_MAX_TOKENS: u32 = 500;
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// Classifies a user message into an `IntentDescriptor`.
pub struct IntentClassifier {
    model: Arc<dyn ChatModel>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Classify one message. Total: any failure falls back to the default
    /// descriptor (`general_query`, empty arrays) and is logged, never
    /// surfaced.
    pub async fn classify(&self, message: &str) -> IntentDescriptor {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system(classify_prompt()),
                ChatMessage::user(message),
            ],
            CLASSIFY_MAX_TOKENS,
            CLASSIFY_TEMPERATURE,
        );

        let completion = match self.model.complete(request).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Intent classification failed: {}. Using default intent.", e);
                return IntentDescriptor::default();
            }
        };

        match extract_json(&completion.content) {
            Ok(value) => {
                let intent = parse_descriptor(&value);
                debug!(intent = %intent.intent, tools = ?intent.tools, "Classified intent");
                intent
            }
            Err(e) => {
                warn!(
                    "Intent classification returned unusable JSON: {}. Using default intent.",
                    e
                );
                IntentDescriptor::default()
            }
        }
    }
}

/// Recover a descriptor field by field. Wrong-typed fields are dropped,
/// non-string array elements filtered.
fn parse_descriptor(value: &serde_json::Value) -> IntentDescriptor {
    let fallback = IntentDescriptor::default();
    let entities = value.get("entities").cloned().unwrap_or_default();
    IntentDescriptor {
        intent: string_field(value, "intent").unwrap_or(fallback.intent),
        entities: IntentEntities {
            symbols: string_array(&entities, "symbols"),
            companies: string_array(&entities, "companies"),
            timeframes: string_array(&entities, "timeframes"),
            metrics: string_array(&entities, "metrics"),
        },
        tools: string_array(value, "tools"),
        keywords: string_array(value, "keywords"),
    }
}

fn classify_prompt() -> String {
    format!(
        "You are the intent classifier for a financial dashboard assistant.\n\
         Analyze the user's message and respond with ONLY a JSON object, no \
         prose, in exactly this shape:\n\
         {{\n\
         \x20 \"intent\": \"<short snake_case label, e.g. price_check>\",\n\
         \x20 \"entities\": {{\n\
         \x20   \"symbols\": [\"<ticker symbols mentioned>\"],\n\
         \x20   \"companies\": [\"<company names mentioned>\"],\n\
         \x20   \"timeframes\": [\"<timeframes mentioned>\"],\n\
         \x20   \"metrics\": [\"<metrics mentioned>\"]\n\
         \x20 }},\n\
         \x20 \"tools\": [\"<tools to call, from the list below>\"],\n\
         \x20 \"keywords\": [\"<topic keywords for knowledge lookup>\"]\n\
         }}\n\
         Available tools: {}.\n\
         Select only tools that directly help answer the message. Use an \
         empty array when none apply.",
        KNOWN_TOOL_NAMES.join(", ")
    )
}
