//! Reading image files into data URLs
//!
//! A batch is decoded as a fan-out of independent reads; one bad file never
//! sinks the rest.

use std::path::PathBuf;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data_url::DataUrl;

/// Where an incoming image comes from (file picker, drop, clipboard)
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Memory { name: String, bytes: Vec<u8> },
}

impl ImageSource {
    pub fn memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        ImageSource::Memory {
            name: name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Memory { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// Per-file ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a supported image")]
    NotAnImage(String),
}

/// Result of decoding a batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully encoded data URLs, in input order
    pub images: Vec<String>,
    pub failures: Vec<IngestError>,
}

impl BatchOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Read one source and encode it as a data URL
pub async fn encode_source(source: ImageSource) -> Result<String, IngestError> {
    let name = source.name();
    let bytes = match source {
        ImageSource::Path(path) => tokio::fs::read(&path)
            .await
            .map_err(|source| IngestError::Read {
                name: name.clone(),
                source,
            })?,
        ImageSource::Memory { bytes, .. } => bytes,
    };

    let format = image::guess_format(&bytes).map_err(|_| IngestError::NotAnImage(name.clone()))?;
    debug!("Read {} ({}, {} bytes)", name, format.to_mime_type(), bytes.len());

    Ok(DataUrl::encode(format.to_mime_type(), &bytes))
}

/// Decode every source concurrently
pub async fn encode_batch(sources: Vec<ImageSource>) -> BatchOutcome {
    let results = join_all(sources.into_iter().map(encode_source)).await;

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(url) => outcome.images.push(url),
            Err(e) => {
                warn!("Upload failed: {}", e);
                outcome.failures.push(e);
            }
        }
    }
    outcome
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// A tiny PNG with a distinguishing pixel
    pub(crate) fn png(seed: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([seed, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_encode_memory_png() {
        let url = encode_source(ImageSource::memory("a.png", png(1))).await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(DataUrl::decode(&url).unwrap().data, png(1));
    }

    #[tokio::test]
    async fn test_encode_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.png");
        std::fs::write(&path, png(2)).unwrap();

        let url = encode_source(path.into()).await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let err = encode_source(ImageSource::memory("notes.txt", b"hello".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::NotAnImage(name) if name == "notes.txt"));
    }

    #[tokio::test]
    async fn test_batch_partial_failure() {
        let outcome = encode_batch(vec![
            ImageSource::memory("a.png", png(1)),
            ImageSource::Path(PathBuf::from("/definitely/missing.png")),
            ImageSource::memory("b.png", png(2)),
        ])
        .await;

        assert_eq!(outcome.images.len(), 2);
        assert!(outcome.has_failures());
        assert!(matches!(outcome.failures[0], IngestError::Read { .. }));
        assert_eq!(DataUrl::decode(&outcome.images[1]).unwrap().data, png(2));
    }
}
