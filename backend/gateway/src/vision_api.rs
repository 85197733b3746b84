//! The relay endpoint: `POST /api/vision`.
//!
//! Accepts `{ "photo": <data URL> }` and streams back the report model's
//! text deltas; the fully concatenated body is one ScanReport JSON
//! document. A missing `photo` becomes the empty string rather than a
//! validation error.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct VisionRequest {
    #[serde(default)]
    pub photo: String,
}

/// Handler for `POST /api/vision`.
pub async fn analyze_scan(
    State(state): State<GatewayState>,
    Json(payload): Json<VisionRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    info!(%request_id, photo_chars = payload.photo.len(), "Scan analysis requested");

    match state.analyzer.analyze(&payload.photo).await {
        Ok(stream) => {
            let bytes = stream.map(move |chunk| match chunk {
                Ok(text) => Ok(Bytes::from(text)),
                Err(e) => {
                    // Streaming already started; all we can do is truncate.
                    error!(%request_id, error = %e, "Report stream failed mid-response");
                    Err(std::io::Error::other(e.to_string()))
                }
            });
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Body::from_stream(bytes),
            )
                .into_response()
        }
        Err(e) => {
            error!(%request_id, error = %e, "Analysis pipeline failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream analysis failed" })),
            )
                .into_response()
        }
    }
}
