//! Metadata extraction from audio tags

use hearth_core::{
    ExtractedMetadata, HearthError, MetadataExtractor, UNKNOWN_ALBUM, UNKNOWN_ARTIST,
};
use lofty::{Accessor, AudioFile, PictureType, TaggedFileExt};
use std::path::Path;
use std::time::Duration;

/// Reads tags and embedded artwork with lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyExtractor;

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> hearth_core::Result<ExtractedMetadata> {
        let tagged_file = lofty::read_from_path(path)
            .map_err(|e| HearthError::metadata(format!("Failed to read tags: {}", e)))?;

        let duration = tagged_file.properties().duration();
        let mut metadata = ExtractedMetadata {
            duration_seconds: (!duration.is_zero()).then(|| duration.as_secs_f64()),
            ..ExtractedMetadata::default()
        };

        // Prefer the format's primary tag (ID3v2 for MP3, Vorbis for OGG/FLAC)
        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(metadata);
        };

        metadata.title = tag.title().map(|s| s.to_string());
        metadata.artist = tag.artist().map(|s| s.to_string());
        metadata.album = tag.album().map(|s| s.to_string());
        metadata.track_number = tag.track();
        metadata.year = tag.year().and_then(|y| i32::try_from(y).ok());

        // Front cover if tagged as such, otherwise the first picture
        let pictures = tag.pictures();
        metadata.artwork = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first())
            .map(|p| p.data().to_vec())
            .filter(|data| !data.is_empty());

        Ok(metadata)
    }
}

/// Metadata with every fallback applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: f64,
    pub track_number: Option<u32>,
    pub year: Option<i32>,
    pub artwork: Option<Vec<u8>>,
}

/// Fill in missing fields
///
/// Title falls back to the original file stem, artist and album to the
/// "Unknown" placeholders, duration to the probe result. Blank strings
/// count as missing.
pub fn resolve(
    extracted: ExtractedMetadata,
    original_name: &str,
    probed: Duration,
) -> ResolvedMetadata {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original_name);

    let duration_seconds = extracted
        .duration_seconds
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or_else(|| probed.as_secs_f64());

    ResolvedMetadata {
        title: non_blank(extracted.title).unwrap_or_else(|| stem.to_string()),
        artist: non_blank(extracted.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: non_blank(extracted.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        duration_seconds,
        track_number: extracted.track_number,
        year: extracted.year,
        artwork: extracted.artwork.filter(|a| !a.is_empty()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_applies_defaults() {
        let resolved = resolve(
            ExtractedMetadata::default(),
            "01 Come Together.mp3",
            Duration::from_secs(259),
        );

        assert_eq!(resolved.title, "01 Come Together");
        assert_eq!(resolved.artist, UNKNOWN_ARTIST);
        assert_eq!(resolved.album, UNKNOWN_ALBUM);
        assert!((resolved.duration_seconds - 259.0).abs() < f64::EPSILON);
        assert!(resolved.artwork.is_none());
    }

    #[test]
    fn test_resolve_keeps_tags() {
        let extracted = ExtractedMetadata {
            title: Some("Something".to_string()),
            artist: Some("The Beatles".to_string()),
            album: Some("Abbey Road".to_string()),
            duration_seconds: Some(182.5),
            track_number: Some(2),
            year: Some(1969),
            artwork: Some(vec![1, 2, 3]),
        };

        let resolved = resolve(extracted, "x.mp3", Duration::from_secs(1));

        assert_eq!(resolved.title, "Something");
        assert_eq!(resolved.artist, "The Beatles");
        assert_eq!(resolved.album, "Abbey Road");
        assert!((resolved.duration_seconds - 182.5).abs() < f64::EPSILON);
        assert_eq!(resolved.track_number, Some(2));
        assert_eq!(resolved.artwork, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_blank_tags_count_as_missing() {
        let extracted = ExtractedMetadata {
            title: Some("   ".to_string()),
            artist: Some(String::new()),
            ..ExtractedMetadata::default()
        };

        let resolved = resolve(extracted, "take.wav", Duration::ZERO);
        assert_eq!(resolved.title, "take");
        assert_eq!(resolved.artist, UNKNOWN_ARTIST);
        assert!(resolved.duration_seconds.abs() < f64::EPSILON);
    }

    #[test]
    fn test_extract_fails_on_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(LoftyExtractor.extract(&path).is_err());
    }
}
