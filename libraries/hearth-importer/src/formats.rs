//! Supported audio formats

use std::path::Path;

/// Extensions the importer accepts, lowercase
///
/// Limited to containers `SymphoniaProbe` can open and decode. ALAC arrives
/// inside `.m4a` or `.caf`.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "aac", "flac", "wav", "aif", "aiff", "ogg", "caf",
];

/// Check if a path has a supported audio extension (case-insensitive)
pub fn is_supported(path: &Path) -> bool {
    audio_extension(path).is_some()
}

/// Get the lowercase audio extension if it is supported
pub fn audio_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("song.mp3")));
        assert!(is_supported(Path::new("song.FLAC")));
        assert!(is_supported(Path::new("/a/b/song.Aiff")));
        assert!(is_supported(Path::new("voice.caf")));
    }

    #[test]
    fn test_unsupported_extensions() {
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("cover.jpg")));
        assert!(!is_supported(Path::new("no_extension")));
        assert!(!is_supported(Path::new(".mp3")));
    }

    #[test]
    fn test_formats_without_a_decoder_are_rejected() {
        // No Opus decoder in symphonia
        assert!(!is_supported(Path::new("voice.opus")));
        assert!(!is_supported(Path::new("track.alac")));
    }

    #[test]
    fn test_audio_extension_is_lowercased() {
        assert_eq!(audio_extension(Path::new("x.M4A")), Some("m4a".to_string()));
        assert_eq!(audio_extension(Path::new("x.doc")), None);
    }
}
