//! The two-step relay pipeline: vision call, then JSON-mode report call.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use scanlens_core::{ChatMessage, ChatProvider, ChatRequest, ResponseFormat, TextStream};
use scanlens_media::DataUrl;

use crate::prompts;

/// Runs the fixed analysis pipeline against one provider.
///
/// The two model calls are strictly sequential: the report call consumes
/// the vision call's free-text output. Neither output is validated here;
/// the report stream is handed back exactly as the provider emits it.
pub struct ScanAnalyzer {
    provider: Arc<dyn ChatProvider>,
    vision_model: String,
    report_model: String,
    vision_max_tokens: u32,
}

impl ScanAnalyzer {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        vision_model: impl Into<String>,
        report_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            vision_model: vision_model.into(),
            report_model: report_model.into(),
            vision_max_tokens: 1000,
        }
    }

    pub fn with_vision_max_tokens(mut self, max_tokens: u32) -> Self {
        self.vision_max_tokens = max_tokens;
        self
    }

    /// Analyze one scan screenshot, given as an inline data URL.
    ///
    /// An empty `photo` is forwarded as-is; the vision model answers for an
    /// empty image reference and the pipeline carries on.
    pub async fn analyze(&self, photo: &str) -> Result<TextStream> {
        match DataUrl::parse(photo) {
            Some(data_url) => debug!(
                mime = %data_url.mime_type,
                approx_bytes = data_url.payload_size(),
                "Received scan screenshot"
            ),
            None => warn!("Photo is not a parseable data URL; forwarding anyway"),
        }

        let vision_request = ChatRequest::new(
            &self.vision_model,
            vec![
                ChatMessage::system(prompts::VISION_SYSTEM_PROMPT),
                ChatMessage::user_image(photo),
            ],
        )
        .with_max_tokens(self.vision_max_tokens);

        let vision = self.provider.complete(&vision_request).await?;
        info!(
            provider = %vision.provider,
            model = %vision.model,
            tokens = vision.tokens_used,
            latency_ms = vision.latency_ms,
            "Vision analysis complete"
        );

        let report_request = ChatRequest::new(
            &self.report_model,
            vec![
                ChatMessage::system(prompts::REPORT_SYSTEM_PROMPT),
                ChatMessage::user(vision.content),
            ],
        )
        .with_response_format(ResponseFormat::JsonObject);

        self.provider.stream(&report_request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use scanlens_core::{ContentPart, MessageContent, Role};
    use scanlens_provider::MockProvider;

    const REPORT_JSON: &str = r#"{"scanSummary":{},"recommendations":{}}"#;

    fn analyzer_with(provider: Arc<MockProvider>) -> ScanAnalyzer {
        ScanAnalyzer::new(provider, "vision-model", "report-model")
    }

    #[tokio::test]
    async fn issues_exactly_two_sequential_calls() {
        let provider = Arc::new(
            MockProvider::new()
                .with_response("free-text analysis")
                .with_response(REPORT_JSON),
        );
        let analyzer = analyzer_with(Arc::clone(&provider));

        let stream = analyzer
            .analyze("data:image/png;base64,AAAA")
            .await
            .unwrap();
        let body: String = stream.map(|c| c.unwrap()).collect::<Vec<_>>().await.concat();
        assert_eq!(body, REPORT_JSON);

        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 2);

        // First call: vision model, image message carrying the photo.
        assert_eq!(requests[0].model, "vision-model");
        assert_eq!(requests[0].max_tokens, Some(1000));
        let image_url = match &requests[0].messages[1].content {
            MessageContent::Parts(parts) => match &parts[0] {
                ContentPart::ImageUrl { image_url } => image_url.url.clone(),
                other => panic!("unexpected part: {other:?}"),
            },
            other => panic!("unexpected content: {other:?}"),
        };
        assert_eq!(image_url, "data:image/png;base64,AAAA");

        // Second call: report model in JSON mode, fed the first call's text.
        assert_eq!(requests[1].model, "report-model");
        assert!(requests[1].response_format.is_some());
        assert_eq!(requests[1].messages[1].role, Role::User);
        assert_eq!(
            requests[1].messages[1].content.as_text(),
            "free-text analysis"
        );
    }

    #[tokio::test]
    async fn empty_photo_is_forwarded_not_rejected() {
        let provider = Arc::new(MockProvider::new());
        let analyzer = analyzer_with(Arc::clone(&provider));

        analyzer.analyze("").await.unwrap();

        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 2);
        let image_url = match &requests[0].messages[1].content {
            MessageContent::Parts(parts) => match &parts[0] {
                ContentPart::ImageUrl { image_url } => image_url.url.clone(),
                other => panic!("unexpected part: {other:?}"),
            },
            other => panic!("unexpected content: {other:?}"),
        };
        assert_eq!(image_url, "");
    }

    #[tokio::test]
    async fn vision_failure_stops_the_pipeline() {
        let provider = Arc::new(MockProvider::new().with_failure("upstream down"));
        let analyzer = analyzer_with(Arc::clone(&provider));

        assert!(analyzer.analyze("data:image/png;base64,AAAA").await.is_err());
        // The report call never happens.
        assert_eq!(provider.recorded_requests().len(), 1);
    }
}
