//! The four image slots: one room photo, up to three floor samples

use crate::generate::{GenerationRequest, MAX_FLOOR_IMAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Room,
    Floor,
}

/// An image held in memory as a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub role: ImageRole,
    pub data_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImageSlots {
    room: Option<UploadedImage>,
    floors: Vec<UploadedImage>,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self) -> Option<&UploadedImage> {
        self.room.as_ref()
    }

    pub fn floors(&self) -> &[UploadedImage] {
        &self.floors
    }

    /// Replace the room photo
    pub fn set_room(&mut self, data_url: String) {
        self.room = Some(UploadedImage {
            role: ImageRole::Room,
            data_url,
        });
    }

    /// Append floor samples, skipping duplicates and anything past capacity
    ///
    /// Returns how many were added.
    pub fn add_floors(&mut self, data_urls: impl IntoIterator<Item = String>) -> usize {
        let before = self.floors.len();
        for data_url in data_urls {
            if self.floors.len() >= MAX_FLOOR_IMAGES {
                break;
            }
            if self.floors.iter().any(|f| f.data_url == data_url) {
                continue;
            }
            self.floors.push(UploadedImage {
                role: ImageRole::Floor,
                data_url,
            });
        }
        self.floors.len() - before
    }

    pub fn remove_room(&mut self) -> bool {
        self.room.take().is_some()
    }

    pub fn remove_floor(&mut self, index: usize) -> bool {
        if index < self.floors.len() {
            self.floors.remove(index);
            true
        } else {
            false
        }
    }

    pub fn remaining_floor_slots(&self) -> usize {
        MAX_FLOOR_IMAGES.saturating_sub(self.floors.len())
    }

    /// A room photo and at least one floor sample are present
    pub fn is_ready(&self) -> bool {
        self.room.is_some() && !self.floors.is_empty()
    }

    pub fn clear(&mut self) {
        self.room = None;
        self.floors.clear();
    }

    /// The request these slots describe, if complete
    pub fn to_request(&self) -> Option<GenerationRequest> {
        if !self.is_ready() {
            return None;
        }
        let room = self.room.as_ref()?;
        Some(GenerationRequest::new(
            room.data_url.clone(),
            self.floors.iter().map(|f| f.data_url.clone()).collect(),
        ))
    }
}
