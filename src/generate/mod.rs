//! Floor generation pipeline
//!
//! Provides:
//! - Request validation and the fixed multimodal prompt
//! - Image URL extraction from provider responses
//! - The streaming relay that turns upstream SSE into generation events

mod events;
mod extract;
mod prompt;
mod relay;
mod request;

pub use events::GenerationEvent;
pub use extract::{extract_image_url, Extractor, EXTRACTORS};
pub use prompt::{build_content, FLOOR_PROMPT};
pub use relay::{image_from_line, relay_events};
pub use request::{GenerateError, GeneratedImage, GenerationRequest, MAX_FLOOR_IMAGES};

/// Validation failure shown to the user
pub const INVALID_REQUEST_MESSAGE: &str = "De sfeerfoto en minimaal een vloerfoto zijn verplicht";

/// Provider API key missing from configuration
pub const MISSING_API_KEY_MESSAGE: &str = "API key niet geconfigureerd";

/// Fallback when the provider fails without a message of its own
pub const PROVIDER_FAILED_MESSAGE: &str = "Fout bij het aanroepen van de AI";

/// Provider answered but no image could be extracted
pub const NO_IMAGE_MESSAGE: &str = "Geen afbeelding ontvangen van de AI";

/// Upstream stream broke off mid-read
pub const STREAM_FAILED_MESSAGE: &str = "Fout tijdens het streamen van de AI";

/// First status pushed once the stream is open
pub const GENERATING_STATUS: &str = "AI genereert de nieuwe vloer...";
