//! Grounded response synthesis.
//!
//! The primary model call answers the user from the turn's evidence: tool
//! outcomes serialized verbatim, knowledge excerpts, caller context, and a
//! bounded window of conversation history. A second call derives follow-up
//! suggestions and is allowed to fail silently.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use tracing::warn;

use finpilot_core::{
    ChatTurn, Confidence, IntentDescriptor, KnowledgeEntry, RequestContext, Role, ToolOutcome,
};
use finpilot_llm::json::string_array;
use finpilot_llm::{extract_json, ChatMessage, ChatModel, CompletionRequest, LlmError};

/// Confidence reported when synthesis succeeds. Placeholder policy: fixed
/// rather than derived from evidence quality.
pub const SUCCESS_CONFIDENCE: f64 = 0.85;
/// Confidence reported on the degraded fallback path.
pub const DEGRADED_CONFIDENCE: f64 = 0.1;

const KNOWLEDGE_EXCERPT_CHARS: usize = 100;
const SYNTH_MAX_TOKENS: u32 = 800;
const SYNTH_TEMPERATURE: f32 = 0.7;
const SUGGEST_MAX_TOKENS: u32 = 300;
const SUGGEST_TEMPERATURE: f32 = 0.7;
const MAX_FOLLOW_UPS: usize = 3;
const MAX_RELATED_TOPICS: usize = 5;

/// Whether the US stock market is open at the given instant.
///
/// Fixed rule: Monday through Friday, 09:30 to 16:00, at a fixed UTC-5
/// offset. Deliberately not DST-aware and ignorant of market holidays.
pub fn market_open(now: DateTime<Utc>) -> bool {
    let local = now - chrono::Duration::hours(5);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let minutes = local.hour() * 60 + local.minute();
    (570..960).contains(&minutes)
}

/// The synthesizer's output for a successful primary call.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub message: String,
    pub sources: Vec<String>,
    pub confidence: Confidence,
    pub tokens: u32,
}

pub struct ResponseSynthesizer {
    model: Arc<dyn ChatModel>,
    history_window: usize,
}

impl ResponseSynthesizer {
    pub fn new(model: Arc<dyn ChatModel>, history_window: usize) -> Self {
        Self {
            model,
            history_window,
        }
    }

    /// The primary synthesis call. Errors propagate to the driver, which
    /// converts them into the degraded response.
    #[allow(clippy::too_many_arguments)]
    pub async fn synthesize(
        &self,
        message: &str,
        intent: &IntentDescriptor,
        outcomes: &BTreeMap<String, ToolOutcome>,
        knowledge: &[KnowledgeEntry],
        history: &[ChatTurn],
        context: &RequestContext,
    ) -> Result<Synthesis, LlmError> {
        let system = build_system_prompt(Utc::now(), intent, outcomes, knowledge, context);

        let mut messages = Vec::with_capacity(self.history_window + 2);
        messages.push(ChatMessage::system(system));
        let start = history.len().saturating_sub(self.history_window);
        for turn in &history[start..] {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(turn.content.clone()),
                Role::Assistant => ChatMessage::assistant(turn.content.clone()),
            });
        }
        messages.push(ChatMessage::user(message));

        let completion = self
            .model
            .complete(CompletionRequest::new(
                messages,
                SYNTH_MAX_TOKENS,
                SYNTH_TEMPERATURE,
            ))
            .await?;

        Ok(Synthesis {
            message: completion.content,
            sources: collect_sources(outcomes, knowledge),
            confidence: Confidence::new(SUCCESS_CONFIDENCE),
            // Follow-up cost is deliberately excluded from the turn total.
            tokens: completion.tokens,
        })
    }

    /// Derive follow-up questions and related topics from the finished
    /// reply. Total: any failure yields empty arrays.
    pub async fn suggest(&self, message: &str, reply: &str) -> (Vec<String>, Vec<String>) {
        let prompt = format!(
            "A user of a financial dashboard asked:\n{}\n\nThe assistant replied:\n{}\n\n\
             Respond with ONLY a JSON object in this shape:\n\
             {{\"followUpQuestions\": [\"2-3 natural next questions\"], \
             \"relatedTopics\": [\"3-5 short topic labels\"]}}",
            message, reply
        );
        let request = CompletionRequest::new(
            vec![ChatMessage::user(prompt)],
            SUGGEST_MAX_TOKENS,
            SUGGEST_TEMPERATURE,
        );

        let completion = match self.model.complete(request).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Suggestion call failed: {}. Returning no suggestions.", e);
                return (Vec::new(), Vec::new());
            }
        };
        match extract_json(&completion.content) {
            Ok(value) => {
                let mut follow_ups = string_array(&value, "followUpQuestions");
                follow_ups.truncate(MAX_FOLLOW_UPS);
                let mut topics = string_array(&value, "relatedTopics");
                topics.truncate(MAX_RELATED_TOPICS);
                (follow_ups, topics)
            }
            Err(e) => {
                warn!("Suggestion output unusable: {}. Returning no suggestions.", e);
                (Vec::new(), Vec::new())
            }
        }
    }
}

/// Sources cited in the response: successful tools first (in key order),
/// then matched knowledge titles, de-duplicated in first-seen order.
fn collect_sources(
    outcomes: &BTreeMap<String, ToolOutcome>,
    knowledge: &[KnowledgeEntry],
) -> Vec<String> {
    let mut sources: Vec<String> = outcomes
        .iter()
        .filter(|(_, outcome)| outcome.is_success())
        .map(|(name, _)| name.clone())
        .collect();
    for entry in knowledge {
        if !sources.contains(&entry.title) {
            sources.push(entry.title.clone());
        }
    }
    sources
}

fn build_system_prompt(
    now: DateTime<Utc>,
    intent: &IntentDescriptor,
    outcomes: &BTreeMap<String, ToolOutcome>,
    knowledge: &[KnowledgeEntry],
    context: &RequestContext,
) -> String {
    let market_status = if market_open(now) { "open" } else { "closed" };
    let mut prompt = format!(
        "You are the conversational assistant of a financial dashboard.\n\
         Today's date is {}. The US stock market is currently {}.\n\
         The user's request was classified as: {}.\n",
        now.format("%Y-%m-%d"),
        market_status,
        intent.intent
    );

    if !outcomes.is_empty() {
        prompt.push_str("\nTool results (verbatim JSON, keyed by tool):\n");
        for (name, outcome) in outcomes {
            let body = serde_json::to_string(&outcome.to_value())
                .unwrap_or_else(|_| "null".to_string());
            prompt.push_str(&format!("- {}: {}\n", name, body));
        }
    }

    if !context.is_empty() {
        prompt.push_str("\nUser context:\n");
        for (label, value) in [
            ("portfolio", &context.portfolio),
            ("watchlist", &context.watchlist),
            ("preferences", &context.preferences),
        ] {
            if let Some(value) = value {
                let body =
                    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
                prompt.push_str(&format!("- {}: {}\n", label, body));
            }
        }
    }

    if !knowledge.is_empty() {
        prompt.push_str("\nBackground knowledge:\n");
        for entry in knowledge {
            prompt.push_str(&format!(
                "- {}: {}\n",
                entry.title,
                excerpt(&entry.content, KNOWLEDGE_EXCERPT_CHARS)
            ));
        }
    }

    prompt.push_str(
        "\nGuidelines:\n\
         - Answer from the data above; name the tools whose data you used.\n\
         - If a tool failed or data is missing, say so plainly instead of guessing.\n\
         - Prefer short paragraphs and bullet lists over long prose.\n\
         - End every reply with: \"This is not financial advice.\"\n",
    );
    prompt
}

fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let mut cut: String = content.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}
