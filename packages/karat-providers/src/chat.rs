use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// One chat-completion round trip. Returns the assistant text verbatim;
/// callers that expect structured output do their own validation.
pub async fn complete(cfg: &karat_config::ChatProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_response(json)
}

fn parse_chat_response(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| eyre::eyre!("Chat response is missing message content."))?;

	if content.trim().is_empty() {
		return Err(eyre::eyre!("Chat response content is empty."));
	}

	Ok(content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "product_query" } }
			]
		});
		let parsed = parse_chat_response(json).expect("parse failed");
		assert_eq!(parsed, "product_query");
	}

	#[test]
	fn rejects_empty_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "   " } }
			]
		});
		assert!(parse_chat_response(json).is_err());
	}
}
