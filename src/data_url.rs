//! Data URL encoding and decoding
//!
//! Images travel between client, proxy and provider as
//! `data:<mime>;base64,<payload>` strings.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

/// Data URL errors
#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

/// A decoded data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Encode bytes with the given MIME type
    pub fn encode(mime_type: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, BASE64.encode(data))
    }

    /// Decode a base64 data URL
    pub fn decode(url: &str) -> Result<Self, DataUrlError> {
        let rest = url.strip_prefix("data:").ok_or(DataUrlError::NotDataUrl)?;
        let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::NotDataUrl)?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;

        let data = BASE64.decode(payload.trim())?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Whether a string looks like a data URL
    pub fn is_data_url(url: &str) -> bool {
        url.starts_with("data:")
    }
}
