//! Generation request validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Floor samples forwarded to the provider; extras are ignored
pub const MAX_FLOOR_IMAGES: usize = 3;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("request body is not valid JSON")]
    InvalidBody,

    #[error("roomImage is missing or empty")]
    MissingRoomImage,

    #[error("floorImages must be a non-empty array")]
    MissingFloorImages,

    #[error("floorImages[{0}] is not a non-empty string")]
    InvalidFloorImage(usize),
}

/// Whole-response result of a generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub image_url: String,
}

/// A validated generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub room_image: String,
    pub floor_images: Vec<String>,
}

impl GenerationRequest {
    pub fn new(room_image: impl Into<String>, floor_images: Vec<String>) -> Self {
        Self {
            room_image: room_image.into(),
            floor_images,
        }
    }

    /// Validate a raw JSON body
    ///
    /// Only the first [`MAX_FLOOR_IMAGES`] floor entries are checked and kept.
    pub fn from_json(body: &Value) -> Result<Self, GenerateError> {
        let room_image = match body.get("roomImage") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(GenerateError::MissingRoomImage),
        };

        let floors = match body.get("floorImages") {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(GenerateError::MissingFloorImages),
        };

        let floor_images = floors
            .iter()
            .take(MAX_FLOOR_IMAGES)
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) if !s.is_empty() => Ok(s.clone()),
                _ => Err(GenerateError::InvalidFloorImage(i)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            room_image,
            floor_images,
        })
    }

    /// Floor images that will actually be sent
    pub fn floor_images(&self) -> &[String] {
        let used = self.floor_images.len().min(MAX_FLOOR_IMAGES);
        &self.floor_images[..used]
    }
}
