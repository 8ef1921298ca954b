//! Common test utilities - FloorvizTest harness for end-to-end testing
//!
//! Runs a real floorviz server on a random port, pointed at an in-process
//! stub provider that records what it receives.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use floorviz::{openrouter::ProviderConfig, Config, Server};
use futures_util::stream;
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A 2x2 PNG with a distinguishing pixel
pub fn png(seed: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([seed, 0, 0, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Find a free local port
fn free_addr() -> Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

/// Canned provider behaviour
#[derive(Debug, Clone)]
pub enum StubReply {
    /// SSE body sent as the given raw chunks
    Sse(Vec<String>),
    /// Whole JSON completion
    Json(Value),
    /// Error status with a JSON body
    Error(StatusCode, Value),
    /// 200 with `Content-Length: 0`
    Empty,
}

/// What the stub saw for one call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Fake OpenRouter serving `/chat/completions`
pub struct StubProvider {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    _handle: JoinHandle<()>,
}

impl StubProvider {
    pub async fn start(reply: StubReply) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let calls = Arc::new(Mutex::new(Vec::new()));

        let state = StubState {
            reply,
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/chat/completions", post(completions))
            .with_state(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Stub provider error: {}", e);
            }
        });

        Ok(Self {
            addr,
            calls,
            _handle: handle,
        })
    }

    /// Base URL to configure the server with
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

async fn completions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .calls
        .lock()
        .unwrap()
        .push(RecordedCall { headers, body });

    match state.reply {
        StubReply::Sse(chunks) => {
            let chunks = chunks
                .into_iter()
                .map(|c| Ok::<_, Infallible>(Bytes::from(c)));
            Response::builder()
                .header(header::CONTENT_TYPE, "text/event-stream")
                .body(Body::from_stream(stream::iter(chunks)))
                .unwrap()
        }
        StubReply::Json(value) => Json(value).into_response(),
        StubReply::Error(status, value) => (status, Json(value)).into_response(),
        StubReply::Empty => Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CONTENT_LENGTH, "0")
            .body(Body::empty())
            .unwrap(),
    }
}

/// Test harness that spawns a real floorviz server on a random port
pub struct FloorvizTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl FloorvizTest {
    /// Start a server without an API key
    pub async fn start() -> Result<Self> {
        Self::start_with(ProviderConfig::default()).await
    }

    /// Start a server talking to `stub`
    pub async fn with_stub(stub: &StubProvider) -> Result<Self> {
        Self::start_with(ProviderConfig {
            api_key: Some("test-key".into()),
            base_url: stub.base_url(),
            ..ProviderConfig::default()
        })
        .await
    }

    pub async fn start_with(provider: ProviderConfig) -> Result<Self> {
        let addr = free_addr()?;
        let config = Config {
            bind_addr: addr,
            provider,
            ..Config::default()
        };

        let server = Arc::new(Server::new(config)?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }

    /// POST to the streaming endpoint and collect `(event, data)` pairs
    pub async fn generate_events(&self, body: &Value) -> Result<Vec<(String, String)>> {
        let resp = self.post("/api/generate", body).await?;
        let text = resp.text().await?;
        Ok(parse_sse(&text))
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }
}

impl Drop for FloorvizTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}

/// Split a complete SSE body into `(event, data)` pairs
pub fn parse_sse(text: &str) -> Vec<(String, String)> {
    text.split("\n\n")
        .filter_map(|block| {
            let mut event = "message".to_string();
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = name.trim().to_string();
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
                }
            }
            (!data.is_empty()).then(|| (event, data.join("\n")))
        })
        .collect()
}

/// Upstream SSE line carrying an image in `delta.images`
pub fn image_chunk(url: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({
            "choices": [{"delta": {"images": [{"image_url": {"url": url}}]}}]
        })
    )
}

/// Upstream SSE line with only text
pub fn text_chunk(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({"choices": [{"delta": {"content": text}}]})
    )
}
