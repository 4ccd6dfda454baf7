//! The per-turn orchestration driver.
//!
//! `Assistant::process_message` is total: whatever fails inside the pipeline,
//! the caller gets a well-formed `ChatResponse`. The degraded path still
//! reports real elapsed time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use finpilot_core::config::AssistantConfig;
use finpilot_core::{ChatResponse, ChatTurn, Confidence, RequestContext};
use finpilot_llm::ChatModel;

use crate::executor::ToolExecutor;
use crate::intent::IntentClassifier;
use crate::knowledge::KnowledgeStore;
use crate::registry::ToolRegistry;
use crate::synthesizer::{ResponseSynthesizer, DEGRADED_CONFIDENCE};

const DEGRADED_MESSAGE: &str = "I'm sorry, I'm having trouble processing your request right \
                                now. Please try again in a moment.";

/// The conversational assistant: classifier, executor, knowledge store, and
/// synthesizer behind one entry point.
pub struct Assistant {
    classifier: IntentClassifier,
    executor: ToolExecutor,
    knowledge: Arc<KnowledgeStore>,
    synthesizer: ResponseSynthesizer,
}

impl Assistant {
    pub fn new(
        model: Arc<dyn ChatModel>,
        registry: Arc<ToolRegistry>,
        knowledge: Arc<KnowledgeStore>,
        config: &AssistantConfig,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(model.clone()),
            executor: ToolExecutor::new(
                registry,
                Duration::from_secs(config.tool_timeout_secs),
            ),
            knowledge,
            synthesizer: ResponseSynthesizer::new(model, config.history_window),
        }
    }

    /// Process one user turn. Never returns an error: every internal failure
    /// either degrades locally (default intent, failure outcomes, empty
    /// suggestions) or is converted here into the degraded response.
    pub async fn process_message(
        &self,
        user_id: &str,
        message: &str,
        history: &[ChatTurn],
        context: &RequestContext,
    ) -> ChatResponse {
        let started = Instant::now();

        let intent = self.classifier.classify(message).await;
        let outcomes = self.executor.execute(&intent, user_id).await;
        let knowledge = self.knowledge.retrieve(&intent.keywords);
        debug!(
            intent = %intent.intent,
            tools = outcomes.len(),
            knowledge = knowledge.len(),
            "Turn evidence assembled"
        );

        let synthesis = match self
            .synthesizer
            .synthesize(message, &intent, &outcomes, &knowledge, history, context)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                warn!("Synthesis failed: {}. Returning degraded response.", e);
                return degraded_response(started.elapsed());
            }
        };

        let (follow_up_questions, related_topics) =
            self.synthesizer.suggest(message, &synthesis.message).await;

        let data = if outcomes.is_empty() {
            None
        } else {
            Some(
                outcomes
                    .iter()
                    .map(|(name, outcome)| (name.clone(), outcome.to_value()))
                    .collect(),
            )
        };
        let sources = if synthesis.sources.is_empty() {
            None
        } else {
            Some(synthesis.sources)
        };

        ChatResponse {
            message: synthesis.message,
            data,
            sources,
            confidence: synthesis.confidence.0,
            tokens: synthesis.tokens,
            response_time_ms: started.elapsed().as_millis() as u64,
            follow_up_questions,
            related_topics,
        }
    }
}

fn degraded_response(elapsed: Duration) -> ChatResponse {
    ChatResponse {
        message: DEGRADED_MESSAGE.to_string(),
        data: None,
        sources: None,
        confidence: Confidence::new(DEGRADED_CONFIDENCE).0,
        tokens: 0,
        response_time_ms: elapsed.as_millis() as u64,
        follow_up_questions: Vec::new(),
        related_topics: Vec::new(),
    }
}
