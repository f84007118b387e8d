use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{AudioError, Result};

/// A narration audio asset: the file path and its playback duration.
///
/// Supplied by the external synthesis collaborator; the pipeline only ever
/// consumes the path and duration.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub duration: f64,
}

/// Duration probing for narration files
pub struct AudioProbe;

impl AudioProbe {
    /// Probe an audio file for its duration. The file must exist; use
    /// [`probe_optional`](Self::probe_optional) at the pipeline boundary
    /// where absence is non-fatal.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<AudioAsset> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let duration = match extension.as_str() {
            "wav" => Self::wav_duration(path)?,
            "mp3" | "flac" | "ogg" | "m4a" | "aac" => Self::decoded_duration(path)?,
            _ => {
                return Err(AudioError::UnsupportedFormat { format: extension }.into());
            }
        };

        debug!("Probed {:?}: {:.3}s", path, duration);

        Ok(AudioAsset {
            path: path.to_path_buf(),
            duration,
        })
    }

    /// Probe a path that may not exist. A missing file yields `Ok(None)`;
    /// a present-but-unreadable file is still an error.
    pub fn probe_optional<P: AsRef<Path>>(path: P) -> Result<Option<AudioAsset>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::probe(path).map(Some)
    }

    /// WAV duration from header math, no sample decode
    fn wav_duration(path: &Path) -> Result<f64> {
        let reader = hound::WavReader::open(path).map_err(|_| AudioError::ProbeFailed {
            path: path.display().to_string(),
        })?;

        let spec = reader.spec();
        Ok(reader.duration() as f64 / spec.sample_rate as f64)
    }

    /// Duration of compressed formats via Symphonia, from the codec's frame
    /// count when declared, otherwise by decoding the stream
    fn decoded_duration(path: &Path) -> Result<f64> {
        let probe_failed = || AudioError::ProbeFailed {
            path: path.display().to_string(),
        };

        let file = File::open(path).map_err(|_| probe_failed())?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|_| probe_failed())?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(probe_failed)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params.sample_rate.ok_or_else(probe_failed)?;

        if let Some(n_frames) = codec_params.n_frames {
            return Ok(n_frames as f64 / sample_rate as f64);
        }

        // Some encoders (notably MP3) omit the frame count; decode and count
        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &Default::default())
            .map_err(|_| probe_failed())?;

        let mut total_frames: u64 = 0;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(_) => break,
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => total_frames += decoded.frames() as u64,
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(_) => break,
            }
        }

        Ok(total_frames as f64 / sample_rate as f64)
    }

    /// Check if a file extension names a supported narration format
    pub fn is_format_supported(extension: &str) -> bool {
        matches!(
            extension.to_lowercase().as_str(),
            "wav" | "mp3" | "flac" | "ogg" | "m4a" | "aac"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_silence_wav(path: &Path, secs: f64, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(secs * sample_rate as f64) as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_wav_duration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narration.wav");
        write_silence_wav(&path, 1.0, 44100);

        let asset = AudioProbe::probe(&path).unwrap();
        assert!((asset.duration - 1.0).abs() < 1e-6);
        assert_eq!(asset.path, path);
    }

    #[test]
    fn test_probe_optional_missing_file() {
        let dir = tempdir().unwrap();
        let result = AudioProbe::probe_optional(dir.path().join("absent.wav")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_probe_optional_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narration.wav");
        write_silence_wav(&path, 0.5, 22050);

        let asset = AudioProbe::probe_optional(&path).unwrap().unwrap();
        assert!((asset.duration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narration.xyz");
        std::fs::write(&path, b"dummy content").unwrap();

        let result = AudioProbe::probe(&path);
        assert!(matches!(
            result,
            Err(crate::error::PipelineError::Audio(
                AudioError::UnsupportedFormat { .. }
            ))
        ));
    }

    #[test]
    fn test_format_support() {
        assert!(AudioProbe::is_format_supported("wav"));
        assert!(AudioProbe::is_format_supported("MP3"));
        assert!(!AudioProbe::is_format_supported("xyz"));
    }
}
