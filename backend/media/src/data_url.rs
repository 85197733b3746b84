//! Inline `data:` URL handling for scan screenshots.
//!
//! The client encodes the selected file into a data URL before upload; the
//! relay only ever inspects the URL for logging and passes it through to
//! the vision model untouched.

use std::path::Path;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};

use scanlens_core::ScanLensError;

/// Read an image file and encode it as a `data:<mime>;base64,<payload>` URL.
pub fn encode_image_file(path: &Path) -> Result<String, ScanLensError> {
    let mime = crate::mime_detect::detect_mime_type(path);
    if !crate::mime_detect::is_image(mime) {
        return Err(ScanLensError::UnsupportedImage(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// A parsed inline data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub payload: String,
}

impl DataUrl {
    /// Parse a `data:<mime>;base64,<payload>` string. Returns `None` for
    /// anything else; the relay treats that as unparseable but not fatal.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Approximate decoded size of the payload in bytes.
    pub fn payload_size(&self) -> usize {
        self.payload.len() / 4 * 3
    }
}
