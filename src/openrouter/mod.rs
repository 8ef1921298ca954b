//! OpenRouter integration
//!
//! Provides:
//! - Multimodal chat completions (text plus image references)
//! - Streaming completions as a raw upstream byte stream

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Default OpenRouter API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Image model the floor prompt is tuned for
pub const DEFAULT_MODEL: &str = "bytedance-seed/seedream-4.5";

/// Modalities requested from the model
const MODALITIES: [&str; 2] = ["image", "text"];

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer token; requests fail while this is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
}

impl ProviderConfig {
    /// The API key, treating a blank value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: "https://vloerenconcurrent.com".to_string(),
            title: "Vloerenconcurrent AI Visualizer".to_string(),
        }
    }
}

/// Image reference inside a content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// One part of a multimodal message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageRef },
}

impl ContentPart {
    pub fn text(text: &str) -> Self {
        ContentPart::Text {
            text: text.to_string(),
        }
    }

    pub fn image(url: &str) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageRef {
                url: url.to_string(),
            },
        }
    }
}

/// Chat message with multimodal content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    modalities: [&'static str; 2],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// Raw upstream SSE body
pub type ByteStream = BoxStream<'static, reqwest::Result<Bytes>>;

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OpenRouter API key not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("upstream response has no body")]
    EmptyBody,
}

/// OpenRouter chat-completions client
#[derive(Debug)]
pub struct OpenRouterClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenRouterClient {
    /// Create a new client from configuration
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        // No request timeout: image generation can run for minutes.
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// The configured model identifier
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a completion request and await the whole JSON response
    ///
    /// A success body that is not JSON comes back as `Value::Null`.
    pub async fn complete(&self, content: Vec<ContentPart>) -> Result<Value, ProviderError> {
        let response = self.send(content, false).await?;
        let body = response.text().await?;

        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!("OpenRouter returned a non-JSON body: {}", e);
            Value::Null
        }))
    }

    /// Send a streaming completion request and hand back the raw body
    pub async fn stream(&self, content: Vec<ContentPart>) -> Result<ByteStream, ProviderError> {
        let response = self.send(content, true).await?;
        if response.content_length() == Some(0) {
            return Err(ProviderError::EmptyBody);
        }
        Ok(response.bytes_stream().boxed())
    }

    async fn send(
        &self,
        content: Vec<ContentPart>,
        stream: bool,
    ) -> Result<Response, ProviderError> {
        let api_key = self.config.api_key().ok_or(ProviderError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage::user(content)],
            modalities: MODALITIES,
            stream,
        };

        debug!(
            "Sending chat request to OpenRouter: model={} parts={} stream={}",
            request.model,
            request.messages[0].content.len(),
            stream
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenRouter API error: {} - {}", status, body);
            return Err(ProviderError::Api {
                status,
                message: error_message(&body),
            });
        }

        Ok(response)
    }
}

/// Pull `error.message` out of an upstream error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
