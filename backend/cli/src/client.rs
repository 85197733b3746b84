//! HTTP client for the relay endpoint.

use anyhow::Context;
use serde_json::json;
use tracing::debug;

use scanlens_core::{ScanLensError, ScanReport};

/// Client for a running scanlens relay.
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Upload one encoded screenshot and wait for the complete report.
    ///
    /// The relay streams its response; the whole body is buffered here and
    /// parsed as a single JSON document.
    pub async fn analyze(&self, photo: &str) -> Result<ScanReport, ScanLensError> {
        let response = self
            .http
            .post(format!("{}/api/vision", self.base_url))
            .json(&json!({ "photo": photo }))
            .send()
            .await
            .map_err(|e| anyhow::Error::new(e).context("Relay request failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanLensError::RelayStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow::Error::new(e).context("Reading relay response failed"))?;
        debug!(bytes = body.len(), "Relay response buffered");

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the relay health document.
    pub async fn health(&self) -> anyhow::Result<serde_json::Value> {
        let response = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .context("Health request failed")?;
        response.json().await.context("Parsing health response failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};

    const REPORT_JSON: &str = r#"{
        "scanSummary": {"targetInformation": {"host": "localhost"}},
        "identifiedPorts": {"portDetails": []},
        "securityAnalysis": {"assessment": {"serviceIntentionality": "Check."}},
        "recommendations": {"updateNmap": "Upgrade."}
    }"#;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn parses_buffered_report_body() {
        let router = Router::new().route("/api/vision", post(|| async { REPORT_JSON }));
        let client = RelayClient::new(serve(router).await);

        let report = client.analyze("data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(report.scan_summary.target_information.host, "localhost");
        assert!(!report.security_analysis.assessment.is_empty());
    }

    #[tokio::test]
    async fn non_ok_response_yields_status_error_and_no_report() {
        let router = Router::new()
            .route("/api/vision", post(|| async { StatusCode::BAD_GATEWAY }));
        let client = RelayClient::new(serve(router).await);

        let err = client.analyze("data:image/png;base64,AAAA").await.unwrap_err();
        assert!(matches!(err, ScanLensError::RelayStatus(502)));
    }

    #[tokio::test]
    async fn malformed_body_yields_parse_error() {
        let router = Router::new().route("/api/vision", post(|| async { "not json" }));
        let client = RelayClient::new(serve(router).await);

        let err = client.analyze("data:image/png;base64,AAAA").await.unwrap_err();
        assert!(matches!(err, ScanLensError::MalformedReport(_)));
    }
}
