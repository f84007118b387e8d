use std::path::Path;

use crate::audio::AudioAsset;
use crate::error::Result;

/// Seam for the external text-to-speech collaborator.
///
/// Implementations write a narration file for the given text and language and
/// report the resulting asset. The pipeline never looks inside the synthesis
/// process; it consumes only the produced path and duration.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str, lang: &str, output: &Path) -> Result<AudioAsset>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioProbe;
    use tempfile::tempdir;

    /// Writes a second of silence per word, enough to exercise the seam
    struct SilenceSynthesizer;

    impl SpeechSynthesizer for SilenceSynthesizer {
        fn synthesize(&self, text: &str, _lang: &str, output: &Path) -> Result<AudioAsset> {
            let sample_rate = 8000u32;
            let secs = text.split_whitespace().count().max(1) as f64;

            let spec = hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::create(output, spec)
                .map_err(|_| crate::error::AudioError::SynthesisFailed {
                    reason: "wav create failed".to_string(),
                })?;
            for _ in 0..(secs * sample_rate as f64) as usize {
                writer.write_sample(0i16).map_err(|_| {
                    crate::error::AudioError::SynthesisFailed {
                        reason: "wav write failed".to_string(),
                    }
                })?;
            }
            writer
                .finalize()
                .map_err(|_| crate::error::AudioError::SynthesisFailed {
                    reason: "wav finalize failed".to_string(),
                })?;

            AudioProbe::probe(output)
        }
    }

    #[test]
    fn test_synthesizer_seam_produces_probed_asset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narration.wav");

        let synth = SilenceSynthesizer;
        let asset = synth.synthesize("three word script", "en", &path).unwrap();

        assert_eq!(asset.path, path);
        assert!((asset.duration - 3.0).abs() < 1e-6);
    }
}
