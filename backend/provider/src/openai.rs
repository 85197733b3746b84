use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use scanlens_core::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, ResponseFormat,
    TextStream};

use crate::sse::{SseEvent, SseParser};

/// OpenAI-compatible chat-completions provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
    stream: bool,
}

#[derive(Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(request: &'a ChatRequest, stream: bool) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.response_format.map(|f| match f {
                ResponseFormat::JsonObject => WireResponseFormat {
                    kind: "json_object",
                },
            }),
            stream,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let start = Instant::now();
        let body = ChatCompletionRequest::from_request(request, false);

        debug!(model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Completion HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API returned {}: {}", status, error_body);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let tokens_used = completion
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(ChatResponse {
            content,
            provider: self.name().to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TextStream> {
        let body = ChatCompletionRequest::from_request(request, true);

        debug!(model = %request.model, "Sending streamed completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Streamed completion HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API returned {}: {}", status, error_body);
        }

        let deltas = response
            .bytes_stream()
            .scan(SseParser::new(), |parser, chunk| {
                let items: Vec<Result<String>> = match chunk {
                    Ok(_) if parser.is_done() => Vec::new(),
                    Ok(bytes) => parser
                        .feed(&bytes)
                        .into_iter()
                        .filter_map(|event| match event {
                            SseEvent::Delta(text) => Some(Ok(text)),
                            SseEvent::Done => None,
                        })
                        .collect(),
                    Err(e) => vec![Err(anyhow::Error::new(e)
                        .context("Reading completion stream failed"))],
                };
                futures::future::ready(Some(items))
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(deltas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanlens_core::ChatMessage;

    #[test]
    fn request_body_matches_wire_shape() {
        let request = ChatRequest::new(
            "gpt-4o",
            vec![
                ChatMessage::system("You are a scan expert."),
                ChatMessage::user_image("data:image/png;base64,AAAA"),
            ],
        )
        .with_max_tokens(1000);

        let body = ChatCompletionRequest::from_request(&request, false);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["stream"], false);
        assert!(json.get("temperature").is_none());
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["content"], "You are a scan expert.");
        assert_eq!(
            json["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn json_mode_sets_response_format() {
        let request = ChatRequest::new("gpt-4o", vec![ChatMessage::user("text")])
            .with_response_format(ResponseFormat::JsonObject);
        let body = ChatCompletionRequest::from_request(&request, true);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["stream"], true);
    }
}
