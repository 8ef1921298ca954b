//! HTTP client for the generation proxy

use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::GENERIC_FAILURE_MESSAGE;
use crate::generate::{GeneratedImage, GenerationEvent, GenerationRequest};
use crate::sse::FrameDecoder;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server error {status}: {message}")]
    Server { status: StatusCode, message: String },
}

impl ClientError {
    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Request(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Decoded generation events
pub type EventStream = BoxStream<'static, Result<GenerationEvent, ClientError>>;

/// Talks to a floorviz server
#[derive(Debug, Clone)]
pub struct GenerateClient {
    http: Client,
    base_url: String,
}

impl GenerateClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_client(Client::builder().build()?, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Start a streaming generation
    pub async fn stream(&self, request: &GenerationRequest) -> Result<EventStream, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;
        let response = check(response).await?;

        let mut decoder = FrameDecoder::new();
        let events = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => decoder
                    .push(&bytes)
                    .into_iter()
                    .filter_map(|frame| GenerationEvent::from_frame(&frame.event, frame.data))
                    .map(Ok)
                    .collect::<Vec<_>>(),
                Err(e) => vec![Err(ClientError::from(e))],
            })
            .flat_map(stream::iter);

        Ok(events.boxed())
    }

    /// Run a whole-response generation and return the image URL
    pub async fn generate_once(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/generate/sync", self.base_url))
            .json(request)
            .send()
            .await?;
        let image: GeneratedImage = check(response).await?.json().await?;
        Ok(image.image_url)
    }
}

/// Turn a non-success response into its `{error}` message
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
    debug!("Server answered {}: {}", status, message);

    Err(ClientError::Server { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client = GenerateClient::with_client(Client::new(), "http://127.0.0.1:3000/");
        assert_eq!(client.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn test_user_message() {
        let err = ClientError::Server {
            status: StatusCode::BAD_REQUEST,
            message: "De sfeerfoto en minimaal een vloerfoto zijn verplicht".into(),
        };
        assert_eq!(
            err.user_message(),
            "De sfeerfoto en minimaal een vloerfoto zijn verplicht"
        );
    }
}
