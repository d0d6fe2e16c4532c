use axum::{
	extract::{
		State, WebSocketUpgrade,
		ws::{Message, Utf8Bytes, WebSocket},
	},
	response::Response,
};
use futures_util::{SinkExt, StreamExt};

use crate::{
	routes::{QueryRequest, QueryResponse, resolve_conversation_id},
	state::{AppState, InitState},
};

/// Persistent duplex transport. Each JSON exchange carries the same
/// logical shape as `POST /query` and routes through the identical turn
/// pipeline; the first exchange pins the conversation id for the socket.
pub async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
	ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
	let (mut sender, mut receiver) = socket.split();
	let assistant = match &state.init {
		InitState::Ready(assistant) => assistant.clone(),
		InitState::Failed(reason) => {
			let unavailable = QueryResponse {
				response: format!("System is currently unavailable: {reason}"),
				conversation_id: "error_session".to_string(),
			};

			send_json(&mut sender, &unavailable).await;
			let _ = sender.close().await;

			return;
		},
	};
	let mut conversation_id: Option<String> = None;

	while let Some(message) = receiver.next().await {
		let message = match message {
			Ok(message) => message,
			Err(err) => {
				tracing::debug!(error = %err, "WebSocket receive failed; closing.");

				break;
			},
		};

		match message {
			Message::Text(text) => {
				let request: QueryRequest = match serde_json::from_str(text.as_str()) {
					Ok(request) => request,
					Err(err) => {
						tracing::debug!(error = %err, "Ignoring malformed WebSocket message.");

						continue;
					},
				};
				let id = conversation_id
					.get_or_insert_with(|| resolve_conversation_id(request.conversation_id))
					.clone();
				let response = assistant.respond(&id, &request.query).await;

				send_json(&mut sender, &QueryResponse { response, conversation_id: id }).await;
			},
			Message::Close(_) => break,
			_ => {},
		}
	}
}

async fn send_json<S>(sender: &mut S, payload: &QueryResponse)
where
	S: SinkExt<Message> + Unpin,
{
	let Ok(json) = serde_json::to_string(payload) else {
		return;
	};

	if sender.send(Message::Text(Utf8Bytes::from(json))).await.is_err() {
		tracing::debug!("WebSocket send failed; client likely disconnected.");
	}
}
