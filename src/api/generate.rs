//! Generation endpoints
//!
//! POST /api/generate      - streams `status`/`image`/`error`/`done` events
//! POST /api/generate/sync - returns `{imageUrl}` once the provider is done

use std::borrow::Cow;
use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::post,
    Json, Router,
};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, info};

use super::{ApiError, AppState};
use crate::generate::{
    build_content, extract_image_url, relay_events, GenerateError, GeneratedImage,
    GenerationEvent, GenerationRequest,
};

/// Build the generate router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate", post(generate_stream))
        .route("/api/generate/sync", post(generate_sync))
}

fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<GenerationRequest, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        debug!("Rejected generate body: {}", rejection);
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::Validation(GenerateError::InvalidBody)
        }
    })?;

    GenerationRequest::from_json(&value).map_err(|e| {
        debug!("Invalid generate request: {}", e);
        ApiError::Validation(e)
    })
}

/// Stream the generation as Server-Sent Events
async fn generate_stream(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = parse_body(body)?;
    info!(
        "Streaming generation with {} floor image(s)",
        request.floor_images().len()
    );

    let upstream = state.provider.stream(build_content(&request)).await?;
    let events = relay_events(upstream).map(|event| Ok::<_, Infallible>(sse_event(&event)));

    let mut response = Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-transform"),
    );
    Ok(response)
}

/// Generate and answer with the final image URL
async fn generate_sync(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GeneratedImage>, ApiError> {
    let request = parse_body(body)?;
    info!(
        "Generating with {} floor image(s)",
        request.floor_images().len()
    );

    let response = state.provider.complete(build_content(&request)).await?;
    let image_url = extract_image_url(&response).ok_or(ApiError::NoImage)?;
    info!("Generated image received ({} bytes)", image_url.len());

    Ok(Json(GeneratedImage { image_url }))
}

/// Encode one event; SSE cannot carry carriage returns
fn sse_event(event: &GenerationEvent) -> Event {
    let data = match event.data() {
        d if d.contains('\r') => Cow::Owned(d.replace('\r', "")),
        d => Cow::Borrowed(d),
    };
    Event::default().event(event.name()).data(data)
}
