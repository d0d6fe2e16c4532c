use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::{AppState, InitState};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/query", post(query))
		.route("/ws", get(crate::ws::upgrade))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
	pub query: String,
	pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
	pub response: String,
	pub conversation_id: String,
}

pub(crate) fn resolve_conversation_id(requested: Option<String>) -> String {
	requested
		.filter(|id| !id.trim().is_empty())
		.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

async fn query(State(state): State<AppState>, Json(payload): Json<QueryRequest>) -> Response {
	let assistant = match &state.init {
		InitState::Ready(assistant) => assistant.clone(),
		InitState::Failed(reason) => {
			return (
				StatusCode::SERVICE_UNAVAILABLE,
				Json(QueryResponse {
					response: format!("System is currently unavailable: {reason}"),
					conversation_id: resolve_conversation_id(payload.conversation_id),
				}),
			)
				.into_response();
		},
	};
	let conversation_id = resolve_conversation_id(payload.conversation_id);
	let response = assistant.respond(&conversation_id, &payload.query).await;

	Json(QueryResponse { response, conversation_id }).into_response()
}

async fn health(State(state): State<AppState>) -> Response {
	match &state.init {
		InitState::Ready(assistant) => Json(json!({
			"status": "healthy",
			"active_sessions": assistant.active_sessions(),
		}))
		.into_response(),
		InitState::Failed(reason) => (
			StatusCode::SERVICE_UNAVAILABLE,
			Json(json!({ "status": "unhealthy", "reason": reason })),
		)
			.into_response(),
	}
}
