use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use scanlens_core::{ChatProvider, ChatRequest, ChatResponse, TextStream};

/// A mock chat provider that records every request and plays back scripted
/// responses in order.
pub struct MockProvider {
    name: String,
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
    failure: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Queue a canned response; responses are consumed in FIFO order.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(response.into());
        self
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// All requests seen so far, in call order.
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> String {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "Mock response".to_string())
    }

    fn record(&self, request: &ChatRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.record(request)?;
        Ok(ChatResponse {
            content: self.next_response(),
            provider: self.name.clone(),
            model: request.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TextStream> {
        self.record(request)?;
        let chunks: Vec<Result<String>> = chunk_text(&self.next_response(), 16)
            .into_iter()
            .map(Ok)
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// Split text into chunks of at most `size` characters, respecting char
/// boundaries.
fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|c| c.iter().collect())
        .collect()
}
