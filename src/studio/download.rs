//! Saving the generated image as PNG
//!
//! The result is fetched straight from its URL (or decoded in place when it
//! is a data URL) and re-encoded locally; the proxy is not involved.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::ImageFormat;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::data_url::{DataUrl, DataUrlError};

/// Download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no generated image to download")]
    NoResult,

    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(StatusCode),

    #[error(transparent)]
    DataUrl(#[from] DataUrlError),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Timestamped file name for a download
pub fn download_filename(at: DateTime<Utc>) -> String {
    format!("vloerenconcurrent-ontwerp-{}.png", at.timestamp_millis())
}

/// Get the raw bytes behind an image URL
pub async fn fetch_image(http: &Client, url: &str) -> Result<Vec<u8>, DownloadError> {
    if DataUrl::is_data_url(url) {
        return Ok(DataUrl::decode(url)?.data);
    }

    debug!("Downloading image from: {}", url);
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status()));
    }
    Ok(response.bytes().await?.to_vec())
}

/// Decode any supported format and re-encode it as PNG
pub fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>, DownloadError> {
    let img = image::load_from_memory(bytes)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Fetch, convert and write the image into `dir`
pub async fn save_png(http: &Client, url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
    let bytes = fetch_image(http, url).await?;
    let png = reencode_png(&bytes)?;

    let path = dir.join(download_filename(Utc::now()));
    tokio::fs::write(&path, &png).await?;
    info!("Saved {} ({} bytes)", path.display(), png.len());
    Ok(path)
}
