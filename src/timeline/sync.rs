use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioAsset;
use crate::error::{Result, TimelineError};
use crate::timeline::Timeline;

/// Tolerance for `fail-on-mismatch`: one frame at the fixed output rate
const DURATION_TOLERANCE_SECS: f64 = 1.0 / 24.0;

/// How narration length is reconciled against the visual timeline.
///
/// Narration normally dictates final video length; the policy makes the
/// trailing/overflow behavior explicit instead of leaving it to the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    /// Final duration equals the audio duration exactly: surplus narration
    /// holds the last slide, deficit cuts the visual track
    #[default]
    ExtendLastSlide,

    /// Never lengthen the visual track; final duration is the shorter of the
    /// two
    TruncateVisual,

    /// Reject timelines whose visual length differs from the narration by
    /// more than one frame
    FailOnMismatch,
}

/// Binds an audio asset to a timeline and reconciles total duration.
///
/// Never inspects or modifies slide content, only durations and the audio
/// channel.
pub struct AudioSynchronizer {
    policy: SyncPolicy,
}

impl AudioSynchronizer {
    pub fn new(policy: SyncPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Attach `audio` (already probed; `None` means the asset was missing)
    /// and retime the timeline per policy. A missing asset leaves the
    /// timeline silent with its visually-derived duration.
    pub fn attach(&self, timeline: &mut Timeline, audio: Option<AudioAsset>) -> Result<()> {
        let asset = match audio {
            Some(asset) => asset,
            None => {
                debug!(
                    "No audio bound to {} timeline, keeping visual duration {:.1}s",
                    timeline.profile(),
                    timeline.total_duration()
                );
                return Ok(());
            }
        };

        let visual = timeline.total_duration();
        let target = asset.duration;

        match self.policy {
            SyncPolicy::ExtendLastSlide => {
                if target > visual {
                    timeline.extend_last_to(target);
                } else if target < visual {
                    timeline.truncate_to(target);
                }
            }
            SyncPolicy::TruncateVisual => {
                if target < visual {
                    timeline.truncate_to(target);
                }
            }
            SyncPolicy::FailOnMismatch => {
                if (target - visual).abs() > DURATION_TOLERANCE_SECS {
                    return Err(TimelineError::DurationMismatch {
                        audio: target,
                        visual,
                    }
                    .into());
                }
            }
        }

        debug!(
            "Bound {:.1}s narration to {} timeline ({:.1}s visual -> {:.1}s)",
            target,
            timeline.profile(),
            visual,
            timeline.total_duration()
        );

        timeline.set_audio(asset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Frame, ResolutionProfile};
    use crate::timeline::Slide;
    use std::path::PathBuf;

    fn timeline(durations: &[f64]) -> Timeline {
        let slides: Vec<Slide> = durations
            .iter()
            .map(|&d| Slide::new(Frame::new_filled(4, 4, [0, 0, 0]), String::new(), d))
            .collect();
        let blank = Slide::new(Frame::new_filled(4, 4, [0, 0, 0]), String::new(), 5.0);
        Timeline::compose(ResolutionProfile::Landscape, slides, blank)
    }

    fn asset(duration: f64) -> AudioAsset {
        AudioAsset {
            path: PathBuf::from("narration.wav"),
            duration,
        }
    }

    #[test]
    fn test_missing_audio_keeps_visual_duration() {
        let sync = AudioSynchronizer::new(SyncPolicy::ExtendLastSlide);
        let mut tl = timeline(&[5.0, 5.0]);

        sync.attach(&mut tl, None).unwrap();
        assert!(tl.audio().is_none());
        assert_eq!(tl.total_duration(), 10.0);
    }

    #[test]
    fn test_extend_policy_surplus_audio_holds_last_slide() {
        let sync = AudioSynchronizer::new(SyncPolicy::ExtendLastSlide);
        let mut tl = timeline(&[5.0, 5.0]);

        sync.attach(&mut tl, Some(asset(12.0))).unwrap();
        assert_eq!(tl.total_duration(), 12.0);
        assert_eq!(tl.slides().len(), 2);
        assert_eq!(tl.slides()[1].duration, 7.0);
        assert!(tl.audio().is_some());
    }

    #[test]
    fn test_extend_policy_short_audio_truncates_visual() {
        let sync = AudioSynchronizer::new(SyncPolicy::ExtendLastSlide);
        let mut tl = timeline(&[5.0, 5.0, 5.0]);

        sync.attach(&mut tl, Some(asset(8.0))).unwrap();
        assert_eq!(tl.total_duration(), 8.0);
        assert_eq!(tl.slides().len(), 2);
    }

    #[test]
    fn test_extend_policy_exact_match_unchanged() {
        let sync = AudioSynchronizer::new(SyncPolicy::ExtendLastSlide);
        let mut tl = timeline(&[5.0, 5.0]);

        sync.attach(&mut tl, Some(asset(10.0))).unwrap();
        assert_eq!(tl.total_duration(), 10.0);
        assert_eq!(tl.slides().len(), 2);
    }

    #[test]
    fn test_truncate_policy_never_lengthens() {
        let sync = AudioSynchronizer::new(SyncPolicy::TruncateVisual);
        let mut tl = timeline(&[5.0]);

        sync.attach(&mut tl, Some(asset(30.0))).unwrap();
        assert_eq!(tl.total_duration(), 5.0);

        let mut tl = timeline(&[5.0, 5.0]);
        sync.attach(&mut tl, Some(asset(7.0))).unwrap();
        assert_eq!(tl.total_duration(), 7.0);
    }

    #[test]
    fn test_fail_policy_rejects_mismatch() {
        let sync = AudioSynchronizer::new(SyncPolicy::FailOnMismatch);
        let mut tl = timeline(&[5.0, 5.0]);

        let result = sync.attach(&mut tl, Some(asset(12.0)));
        assert!(result.is_err());
    }

    #[test]
    fn test_fail_policy_accepts_within_tolerance() {
        let sync = AudioSynchronizer::new(SyncPolicy::FailOnMismatch);
        let mut tl = timeline(&[5.0, 5.0]);

        sync.attach(&mut tl, Some(asset(10.02))).unwrap();
        assert!(tl.audio().is_some());
    }
}
