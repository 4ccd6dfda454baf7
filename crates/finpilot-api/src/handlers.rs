//! Route handler functions for all API endpoints.
//!
//! Each handler validates its input, calls into AppState services, and
//! returns JSON. The chat pipeline is total, so `/chat` only fails on
//! invalid requests.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use finpilot_assistant::ToolDescriptor;
use finpilot_core::{ChatResponse, ChatTurn, RequestContext};

use crate::error::ApiError;
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 4_000;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub message: String,
    /// Prior turns, oldest first. The caller owns persistence.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub context: RequestContext,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDescriptor>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// `GET /tools` - the active tool set with parameter schemas.
pub async fn tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: state.registry.list_active(),
    })
}

/// `POST /chat` - process one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "message exceeds {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let user_id = request.user_id.as_deref().unwrap_or("anonymous");
    let response = state
        .assistant
        .process_message(user_id, message, &request.history, &request.context)
        .await;
    Ok(Json(response))
}
