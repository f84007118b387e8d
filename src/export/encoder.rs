use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::render::ResolutionProfile;
use crate::timeline::Timeline;

/// The terminal artifact of one export operation, immutable thereafter
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub path: PathBuf,
    pub profile: ResolutionProfile,
    pub duration: f64,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
}

/// Collision-resistant output token: 8 bytes from the OS CSPRNG, hex encoded.
/// No counters, so concurrent and repeated invocations never reuse a name.
pub fn output_token() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn output_filename(profile: ResolutionProfile, token: &str) -> String {
    format!("video_{}_{}.mp4", profile.name(), token)
}

/// Encodes one finalized timeline to an MP4 via the ffmpeg CLI.
///
/// Slides are static, so each one becomes a single PNG entry with an explicit
/// duration in a concat list; ffmpeg expands that to the fixed output frame
/// rate. One exporter instance per export operation.
pub struct VideoExporter {
    config: ExportConfig,
    video_dir: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl VideoExporter {
    pub fn new<P: Into<PathBuf>>(config: ExportConfig, video_dir: P) -> Self {
        Self {
            config,
            video_dir: video_dir.into(),
            temp_dir: None,
        }
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Encode the timeline and return the finished artifact. Encoding errors
    /// propagate unrecovered; only the exporter's own temp directory is
    /// cleaned up.
    pub async fn export(&mut self, timeline: &Timeline) -> Result<RenderedVideo> {
        let profile = timeline.profile();
        let token = output_token();
        let output_path = self.video_dir.join(output_filename(profile, &token));

        info!(
            "Exporting {} timeline: {} slides, {:.1}s",
            profile,
            timeline.slides().len(),
            timeline.total_duration()
        );

        if !Self::check_ffmpeg_available() {
            return Err(ExportError::EncodingFailed {
                reason: "ffmpeg not found on PATH".to_string(),
            }
            .into());
        }

        let temp_dir = self.ensure_temp_dir(&token)?;

        let slide_paths = self.save_slide_frames(timeline, &temp_dir)?;
        let list_path = self.create_slide_list(timeline, &slide_paths, &temp_dir)?;

        match timeline.audio() {
            Some(asset) => {
                let video_only = temp_dir.join("video_only.mp4");
                self.encode_slides(&list_path, &video_only).await?;
                self.mux_audio(&video_only, &asset.path, &output_path).await?;
            }
            None => {
                self.encode_slides(&list_path, &output_path).await?;
            }
        }

        let metadata = std::fs::metadata(&output_path)?;
        let rendered = RenderedVideo {
            path: output_path,
            profile,
            duration: timeline.total_duration(),
            file_size: metadata.len(),
            created_at: Utc::now(),
        };

        self.cleanup()?;

        info!(
            "Export complete: {:?} ({:.1} MB)",
            rendered.path,
            rendered.file_size as f64 / 1024.0 / 1024.0
        );

        Ok(rendered)
    }

    fn ensure_temp_dir(&mut self, token: &str) -> Result<PathBuf> {
        if let Some(ref temp_dir) = self.temp_dir {
            return Ok(temp_dir.clone());
        }

        let temp_dir = self
            .video_dir
            .join(format!(".slate_tmp_{}_{}", std::process::id(), token));
        create_dir_all(&temp_dir)?;
        self.temp_dir = Some(temp_dir.clone());
        Ok(temp_dir)
    }

    fn save_slide_frames(&self, timeline: &Timeline, temp_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut slide_paths = Vec::with_capacity(timeline.slides().len());

        for (i, slide) in timeline.slides().iter().enumerate() {
            let path = temp_dir.join(format!("slide_{:04}.png", i));
            debug!("Saving slide frame to: {:?}", path);

            slide.frame.save_png(&path).map_err(|e| ExportError::EncodingFailed {
                reason: format!("Failed to save slide frame: {}", e),
            })?;

            slide_paths.push(path);
        }

        Ok(slide_paths)
    }

    /// Concat demuxer input: one entry per slide with its timeline duration.
    /// The final entry is repeated without a duration, which the demuxer
    /// requires to close the list.
    fn create_slide_list(
        &self,
        timeline: &Timeline,
        slide_paths: &[PathBuf],
        temp_dir: &Path,
    ) -> Result<PathBuf> {
        let list_path = temp_dir.join("slides.txt");
        let mut file = File::create(&list_path)?;

        for (slide, path) in timeline.slides().iter().zip(slide_paths) {
            let absolute = path
                .canonicalize()
                .unwrap_or_else(|_| path.clone());
            writeln!(file, "file '{}'", absolute.display())?;
            writeln!(file, "duration {:.6}", slide.duration)?;
        }

        if let Some(last) = slide_paths.last() {
            let absolute = last.canonicalize().unwrap_or_else(|_| last.clone());
            writeln!(file, "file '{}'", absolute.display())?;
        }

        Ok(list_path)
    }

    async fn encode_slides(&self, list_path: &Path, output_path: &Path) -> Result<()> {
        let list_arg = list_path.display().to_string();
        let fps_arg = self.config.fps.to_string();
        let crf_arg = quality_to_crf(self.config.quality).to_string();
        let output_arg = output_path.display().to_string();

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            list_arg.as_str(),
            "-c:v",
            self.config.codec.as_str(),
            "-r",
            fps_arg.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-crf",
            crf_arg.as_str(),
            "-y",
            output_arg.as_str(),
        ]);

        Self::run_ffmpeg(cmd).await
    }

    async fn mux_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let video_arg = video_path.display().to_string();
        let audio_arg = audio_path.display().to_string();
        let output_arg = output_path.display().to_string();

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-i",
            video_arg.as_str(),
            "-i",
            audio_arg.as_str(),
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-shortest",
            "-y",
            output_arg.as_str(),
        ]);

        Self::run_ffmpeg(cmd).await
    }

    async fn run_ffmpeg(mut cmd: Command) -> Result<()> {
        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| ExportError::EncodingFailed {
                reason: format!("Failed to spawn ffmpeg process: {}", e),
            })?
            .map_err(|e| ExportError::EncodingFailed {
                reason: format!("ffmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::EncodingFailed {
                reason: format!("ffmpeg failed: {}", stderr),
            }
            .into());
        }

        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        if let Some(temp_dir) = self.temp_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&temp_dir) {
                warn!("Failed to remove temporary directory {:?}: {}", temp_dir, e);
            }
        }
        Ok(())
    }
}

impl Drop for VideoExporter {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn quality_to_crf(quality: u8) -> u8 {
    (51.0 - (quality as f32 / 100.0) * 51.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Frame;
    use crate::timeline::Slide;
    use tempfile::tempdir;

    fn test_timeline(durations: &[f64]) -> Timeline {
        let slides: Vec<Slide> = durations
            .iter()
            .map(|&d| Slide::new(Frame::new_filled(8, 8, [0, 0, 0]), String::new(), d))
            .collect();
        let blank = Slide::new(Frame::new_filled(8, 8, [0, 0, 0]), String::new(), 5.0);
        Timeline::compose(ResolutionProfile::Landscape, slides, blank)
    }

    #[test]
    fn test_tokens_are_unique_and_hex() {
        let a = output_token();
        let b = output_token();

        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_output_filename_encodes_profile() {
        let name = output_filename(ResolutionProfile::Portrait, "deadbeef00112233");
        assert_eq!(name, "video_portrait_deadbeef00112233.mp4");
    }

    #[test]
    fn test_repeated_exports_get_distinct_paths() {
        let a = output_filename(ResolutionProfile::Landscape, &output_token());
        let b = output_filename(ResolutionProfile::Landscape, &output_token());
        assert_ne!(a, b);
    }

    #[test]
    fn test_slide_list_carries_durations() {
        let dir = tempdir().unwrap();
        let timeline = test_timeline(&[5.0, 2.5]);
        let exporter = VideoExporter::new(ExportConfig::default(), dir.path());

        let slide_paths = exporter.save_slide_frames(&timeline, dir.path()).unwrap();
        assert_eq!(slide_paths.len(), 2);
        assert!(slide_paths.iter().all(|p| p.exists()));

        let list_path = exporter
            .create_slide_list(&timeline, &slide_paths, dir.path())
            .unwrap();
        let list = std::fs::read_to_string(list_path).unwrap();

        assert!(list.contains("duration 5.000000"));
        assert!(list.contains("duration 2.500000"));
        // Closing entry: last file repeated without a duration
        assert_eq!(list.matches("slide_0001.png").count(), 2);
    }

    #[test]
    fn test_quality_to_crf_range() {
        assert_eq!(quality_to_crf(100), 0);
        assert_eq!(quality_to_crf(0), 51);
        assert!(quality_to_crf(85) < quality_to_crf(50));
    }
}
