//! Decode probing with Symphonia

use crate::{ImportError, Result};
use hearth_core::{DecodeProbe, HearthError};
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Opens the container and instantiates a decoder for the default track
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaProbe;

impl DecodeProbe for SymphoniaProbe {
    fn probe(&self, path: &Path) -> hearth_core::Result<Duration> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| HearthError::audio(format!("Failed to probe file: {}", e)))?;

        let track = probed
            .format
            .default_track()
            .ok_or_else(|| HearthError::audio("No default track"))?;

        symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| HearthError::audio(format!("Unsupported codec: {}", e)))?;

        let params = &track.codec_params;
        let duration = match (params.time_base, params.n_frames) {
            (Some(time_base), Some(n_frames)) => {
                let time = time_base.calc_time(n_frames);
                Duration::from_secs_f64(time.seconds as f64 + time.frac)
            }
            _ => Duration::ZERO,
        };

        Ok(duration)
    }
}

/// Verify a managed copy is non-empty and decodable
///
/// Returns the duration reported by the probe.
pub fn check_integrity(probe: &dyn DecodeProbe, path: &Path) -> Result<Duration> {
    let len = std::fs::metadata(path)?.len();
    if len == 0 {
        return Err(ImportError::corrupt(path, "file is empty"));
    }

    probe
        .probe(path)
        .map_err(|e| ImportError::corrupt(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp3");
        std::fs::write(&path, b"").unwrap();

        let result = check_integrity(&SymphoniaProbe, &path);
        assert!(matches!(result, Err(ImportError::CorruptFile { .. })));
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.flac");
        std::fs::write(&path, b"this is not audio at all").unwrap();

        let result = check_integrity(&SymphoniaProbe, &path);
        assert!(matches!(result, Err(ImportError::CorruptFile { .. })));
    }

    #[test]
    fn test_probe_decodes_wav_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        std::fs::write(&path, wav_bytes(8000, 8000)).unwrap();

        let duration = SymphoniaProbe.probe(&path).unwrap();
        assert!((duration.as_secs_f64() - 1.0).abs() < 0.01);
    }

    /// Mono 16-bit PCM WAV of silence
    fn wav_bytes(sample_rate: u32, samples: u32) -> Vec<u8> {
        let data_len = samples * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);
        bytes
    }
}
