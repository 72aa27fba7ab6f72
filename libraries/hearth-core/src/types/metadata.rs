//! Metadata returned by the extraction collaborator

use serde::{Deserialize, Serialize};

/// Artist used when tags carry none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album used when tags carry none
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Descriptive metadata read from an audio file
///
/// Every field is optional; extraction may fail independently per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<f64>,
    pub track_number: Option<u32>,
    pub year: Option<i32>,
    #[serde(skip)]
    pub artwork: Option<Vec<u8>>,
}

impl ExtractedMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if metadata has any useful information
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.duration_seconds.is_none()
            && self.track_number.is_none()
            && self.year.is_none()
            && self.artwork.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_empty() {
        let empty = ExtractedMetadata::new();
        assert!(empty.is_empty());

        let filled = ExtractedMetadata {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert!(!filled.is_empty());
    }
}
