//! Streaming relay from upstream SSE to generation events
//!
//! `Open -> status -> Reading { image at most once } -> (EOF | read error)
//! -> [error if no image] -> done -> Closed`
//!
//! The relay owns the upstream stream. Dropping it (the client went away)
//! drops the upstream body and with it the provider connection.

use std::fmt;
use std::pin::Pin;

use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    extract_image_url, GenerationEvent, GENERATING_STATUS, NO_IMAGE_MESSAGE,
    STREAM_FAILED_MESSAGE,
};
use crate::sse::{data_payload, LineBuffer};

/// Image URL carried by one upstream SSE line, if any
///
/// Non-data lines, `[DONE]` and unparsable JSON all yield `None`.
pub fn image_from_line(line: &str) -> Option<String> {
    let payload = data_payload(line)?;
    match serde_json::from_str::<Value>(payload) {
        Ok(chunk) => extract_image_url(&chunk),
        Err(e) => {
            debug!("Skipping unparsable upstream line: {}", e);
            None
        }
    }
}

/// Turn an upstream byte stream into the client-facing event stream
pub fn relay_events<S, B, E>(upstream: S) -> impl Stream<Item = GenerationEvent> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    stream::unfold(Relay::new(upstream), |mut relay| async move {
        let event = relay.next_event().await?;
        Some((event, relay))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Reading,
    Finishing,
    Done,
    Closed,
}

struct Relay<S> {
    upstream: Pin<Box<S>>,
    lines: LineBuffer,
    phase: Phase,
    upstream_ended: bool,
    image_sent: bool,
}

impl<S, B, E> Relay<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    fn new(upstream: S) -> Self {
        Self {
            upstream: Box::pin(upstream),
            lines: LineBuffer::new(),
            phase: Phase::Open,
            upstream_ended: false,
            image_sent: false,
        }
    }

    async fn next_event(&mut self) -> Option<GenerationEvent> {
        loop {
            match self.phase {
                Phase::Open => {
                    self.phase = Phase::Reading;
                    return Some(GenerationEvent::Status(GENERATING_STATUS.to_string()));
                }
                Phase::Reading => {
                    if let Some(event) = self.drain_lines() {
                        return Some(event);
                    }
                    if self.upstream_ended {
                        self.phase = Phase::Finishing;
                        continue;
                    }
                    match self.upstream.next().await {
                        Some(Ok(chunk)) => self.lines.push(chunk.as_ref()),
                        Some(Err(e)) => {
                            warn!("Upstream stream failed: {}", e);
                            self.phase = Phase::Finishing;
                            return Some(GenerationEvent::Error(STREAM_FAILED_MESSAGE.to_string()));
                        }
                        None => {
                            self.upstream_ended = true;
                            if let Some(event) =
                                self.lines.finish().and_then(|line| self.consider(&line))
                            {
                                return Some(event);
                            }
                        }
                    }
                }
                Phase::Finishing => {
                    self.phase = Phase::Done;
                    if !self.image_sent {
                        warn!("Upstream stream ended without an image");
                        return Some(GenerationEvent::Error(NO_IMAGE_MESSAGE.to_string()));
                    }
                }
                Phase::Done => {
                    self.phase = Phase::Closed;
                    return Some(GenerationEvent::Done);
                }
                Phase::Closed => return None,
            }
        }
    }

    fn drain_lines(&mut self) -> Option<GenerationEvent> {
        while let Some(line) = self.lines.next_line() {
            if let Some(event) = self.consider(&line) {
                return Some(event);
            }
        }
        None
    }

    fn consider(&mut self, line: &str) -> Option<GenerationEvent> {
        if self.image_sent {
            return None;
        }
        let url = image_from_line(line)?;
        self.image_sent = true;
        info!("Generated image received ({} bytes)", url.len());
        Some(GenerationEvent::Image(url))
    }
}

impl<S> Drop for Relay<S> {
    fn drop(&mut self) {
        if self.phase != Phase::Closed {
            debug!("Generation stream dropped early, cancelling upstream read");
        }
    }
}
