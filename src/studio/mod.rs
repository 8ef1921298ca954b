//! Upload and preview controller
//!
//! `Studio` owns the image slots and the view state. Front ends feed it
//! image sources and render whatever `view()` reports.

mod client;
mod download;
mod ingest;
mod slots;
mod view;

pub use client::{ClientError, EventStream, GenerateClient};
pub use download::{download_filename, fetch_image, reencode_png, save_png, DownloadError};
pub use ingest::{encode_batch, encode_source, BatchOutcome, ImageSource, IngestError};
pub use slots::{ImageRole, ImageSlots, UploadedImage};
pub use view::ViewState;

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::generate::{GenerationEvent, GenerationRequest};

pub const UPLOAD_FAILED_MESSAGE: &str = "Uploaden mislukt";
pub const REQUEST_SENT_STATUS: &str = "AI verzoek verstuurd...";
pub const GENERIC_FAILURE_MESSAGE: &str = "Er is iets misgegaan";

#[derive(Debug, Default)]
pub struct Studio {
    slots: ImageSlots,
    view: ViewState,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &ImageSlots {
        &self.slots
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Set the room photo from the first source
    pub async fn upload_room(&mut self, sources: Vec<ImageSource>) {
        let Some(first) = sources.into_iter().next() else {
            return;
        };
        match encode_source(first).await {
            Ok(url) => self.slots.set_room(url),
            Err(e) => {
                warn!("Room upload failed: {}", e);
                self.view.set_error(UPLOAD_FAILED_MESSAGE);
            }
        }
    }

    /// Append floor samples; returns how many were added
    pub async fn upload_floors(&mut self, sources: Vec<ImageSource>) -> usize {
        if sources.is_empty() {
            return 0;
        }
        let outcome = encode_batch(sources).await;
        self.accept_floors(outcome)
    }

    /// Route pasted images into whatever slots are free
    ///
    /// The first source claims an empty room slot whether or not it decodes;
    /// the rest are deduplicated and fill the remaining floor slots.
    pub async fn paste(&mut self, sources: Vec<ImageSource>) {
        let room_empty = self.slots.room().is_none();
        let remaining = self.slots.remaining_floor_slots();
        if sources.is_empty() || (!room_empty && remaining == 0) {
            return;
        }

        let mut sources = sources.into_iter();
        let room_source = if room_empty { sources.next() } else { None };
        let floor_sources: Vec<_> = sources.collect();

        let (room, mut outcome) = futures_util::join!(
            async {
                match room_source {
                    Some(source) => Some(encode_source(source).await),
                    None => None,
                }
            },
            encode_batch(floor_sources)
        );

        let mut seen = Vec::with_capacity(outcome.images.len() + 1);
        match room {
            Some(Ok(url)) => {
                seen.push(url.clone());
                self.slots.set_room(url);
            }
            Some(Err(e)) => {
                warn!("Pasted room image failed: {}", e);
                self.view.set_error(UPLOAD_FAILED_MESSAGE);
            }
            None => {}
        }

        outcome.images.retain(|url| {
            if seen.contains(url) {
                false
            } else {
                seen.push(url.clone());
                true
            }
        });
        outcome.images.truncate(remaining);
        let added = self.accept_floors(outcome);
        debug!("Paste added {} floor images", added);
    }

    fn accept_floors(&mut self, outcome: BatchOutcome) -> usize {
        if outcome.has_failures() {
            self.view.set_error(UPLOAD_FAILED_MESSAGE);
        }
        self.slots.add_floors(outcome.images)
    }

    pub fn remove_room(&mut self) -> bool {
        self.slots.remove_room()
    }

    pub fn remove_floor(&mut self, index: usize) -> bool {
        self.slots.remove_floor(index)
    }

    /// Room and floor images present and nothing in flight
    pub fn can_generate(&self) -> bool {
        self.slots.is_ready() && !self.view.is_generating()
    }

    /// Enter the generating state and hand back the request to submit
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if !self.can_generate() {
            return None;
        }
        let request = self.slots.to_request()?;
        self.view = ViewState::generating(REQUEST_SENT_STATUS);
        Some(request)
    }

    pub fn apply(&mut self, event: GenerationEvent) {
        self.view.apply(event);
    }

    /// Record a failure; the next `finish_generation` leaves the generating state
    pub fn fail(&mut self, message: impl Into<String>) {
        self.view.set_error(message);
    }

    pub fn finish_generation(&mut self) {
        self.view = std::mem::take(&mut self.view).finish();
    }

    /// Run a streaming generation to completion
    pub async fn generate(&mut self, client: &GenerateClient) -> bool {
        self.generate_with(client, |_| {}).await
    }

    /// Like [`Studio::generate`], calling `on_event` for each event as it lands
    ///
    /// Returns false when generation was not allowed to start.
    pub async fn generate_with<F>(&mut self, client: &GenerateClient, mut on_event: F) -> bool
    where
        F: FnMut(&GenerationEvent),
    {
        let Some(request) = self.begin_generation() else {
            return false;
        };

        match client.stream(&request).await {
            Ok(mut events) => {
                while let Some(item) = events.next().await {
                    match item {
                        Ok(event) => {
                            on_event(&event);
                            self.apply(event);
                        }
                        Err(e) => {
                            warn!("Generation stream failed: {}", e);
                            self.fail(e.user_message());
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Generation request failed: {}", e);
                self.fail(e.user_message());
            }
        }

        self.finish_generation();
        true
    }

    /// Run a whole-response generation
    pub async fn generate_once(&mut self, client: &GenerateClient) -> bool {
        let Some(request) = self.begin_generation() else {
            return false;
        };

        match client.generate_once(&request).await {
            Ok(url) => self.apply(GenerationEvent::Image(url)),
            Err(e) => {
                warn!("Generation request failed: {}", e);
                self.fail(e.user_message());
            }
        }

        self.finish_generation();
        true
    }

    /// Clear everything and go back to collecting
    pub fn reset(&mut self) {
        self.slots.clear();
        self.view = ViewState::default();
    }

    /// Save the current result as PNG into `dir`
    pub async fn download(
        &self,
        http: &reqwest::Client,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let url = self.view.image_url().ok_or(DownloadError::NoResult)?;
        let path = save_png(http, url, dir).await?;
        info!("Downloaded design to {}", path.display());
        Ok(path)
    }
}
