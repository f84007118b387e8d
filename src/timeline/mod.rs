//! # Timeline Module
//!
//! Orders rendered slides into one continuous visual timeline per resolution
//! profile and reconciles it against the narration track.

pub mod sync;

use crate::audio::AudioAsset;
use crate::render::{Frame, ResolutionProfile};

pub use sync::{AudioSynchronizer, SyncPolicy};

/// One rendered visual unit: a frame shown for a span of the timeline.
///
/// Slides are owned by the timeline they are composed into and never shared
/// across profiles.
#[derive(Debug, Clone)]
pub struct Slide {
    pub frame: Frame,
    pub caption: String,
    pub duration: f64,
}

impl Slide {
    pub fn new(frame: Frame, caption: String, duration: f64) -> Self {
        Self {
            frame,
            caption,
            duration,
        }
    }
}

/// An ordered sequence of slides for one resolution profile, with an optional
/// bound audio track. Owned exclusively by one export operation.
#[derive(Debug, Clone)]
pub struct Timeline {
    profile: ResolutionProfile,
    slides: Vec<Slide>,
    audio: Option<AudioAsset>,
}

impl Timeline {
    /// Concatenate slides in input order. An empty list is substituted with
    /// the given blank slide so downstream stages always see a well-formed,
    /// non-zero-duration timeline.
    pub fn compose(profile: ResolutionProfile, slides: Vec<Slide>, blank: Slide) -> Self {
        let slides = if slides.is_empty() { vec![blank] } else { slides };

        Self {
            profile,
            slides,
            audio: None,
        }
    }

    pub fn profile(&self) -> ResolutionProfile {
        self.profile
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn audio(&self) -> Option<&AudioAsset> {
        self.audio.as_ref()
    }

    pub(crate) fn set_audio(&mut self, asset: AudioAsset) {
        self.audio = Some(asset);
    }

    /// Total duration derived from the slide spans
    pub fn total_duration(&self) -> f64 {
        self.slides.iter().map(|s| s.duration).sum()
    }

    /// Cut the timeline at `target` seconds. The slide spanning the boundary
    /// keeps a partial duration; later slides are dropped. No-op when the
    /// timeline is already short enough.
    pub fn truncate_to(&mut self, target: f64) {
        if target >= self.total_duration() {
            return;
        }

        let mut elapsed = 0.0;
        let mut keep = 0;

        for slide in &mut self.slides {
            if elapsed + slide.duration >= target {
                slide.duration = target - elapsed;
                keep += 1;
                break;
            }
            elapsed += slide.duration;
            keep += 1;
        }

        self.slides.truncate(keep);
        self.slides.retain(|s| s.duration > 0.0);
    }

    /// Hold the final slide until `target` seconds. No-op when the timeline
    /// already reaches it.
    pub fn extend_last_to(&mut self, target: f64) {
        let total = self.total_duration();
        if target <= total {
            return;
        }

        if let Some(last) = self.slides.last_mut() {
            last.duration += target - total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(caption: &str, duration: f64) -> Slide {
        Slide::new(
            Frame::new_filled(4, 4, [0, 0, 0]),
            caption.to_string(),
            duration,
        )
    }

    fn blank() -> Slide {
        slide("", 5.0)
    }

    #[test]
    fn test_compose_sums_slide_durations() {
        let slides = vec![slide("A", 5.0), slide("B", 5.0), slide("C", 5.0)];
        let timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        assert_eq!(timeline.slides().len(), 3);
        assert_eq!(timeline.total_duration(), 15.0);
    }

    #[test]
    fn test_compose_preserves_input_order() {
        let slides = vec![slide("A", 5.0), slide("B", 5.0), slide("C", 5.0)];
        let timeline = Timeline::compose(ResolutionProfile::Portrait, slides, blank());

        let captions: Vec<&str> = timeline.slides().iter().map(|s| s.caption.as_str()).collect();
        assert_eq!(captions, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compose_empty_substitutes_blank() {
        let timeline = Timeline::compose(ResolutionProfile::Landscape, vec![], blank());

        assert_eq!(timeline.slides().len(), 1);
        assert_eq!(timeline.total_duration(), 5.0);
        assert!(timeline.audio().is_none());
    }

    #[test]
    fn test_truncate_mid_slide() {
        let slides = vec![slide("A", 5.0), slide("B", 5.0), slide("C", 5.0)];
        let mut timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        timeline.truncate_to(7.0);
        assert_eq!(timeline.slides().len(), 2);
        assert_eq!(timeline.slides()[1].duration, 2.0);
        assert_eq!(timeline.total_duration(), 7.0);
    }

    #[test]
    fn test_truncate_on_slide_boundary() {
        let slides = vec![slide("A", 5.0), slide("B", 5.0), slide("C", 5.0)];
        let mut timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        timeline.truncate_to(10.0);
        assert_eq!(timeline.slides().len(), 2);
        assert_eq!(timeline.total_duration(), 10.0);
    }

    #[test]
    fn test_truncate_noop_when_short_enough() {
        let slides = vec![slide("A", 5.0)];
        let mut timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        timeline.truncate_to(12.0);
        assert_eq!(timeline.slides().len(), 1);
        assert_eq!(timeline.total_duration(), 5.0);
    }

    #[test]
    fn test_extend_last_holds_final_slide() {
        let slides = vec![slide("A", 5.0), slide("B", 5.0)];
        let mut timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        timeline.extend_last_to(12.0);
        assert_eq!(timeline.slides().len(), 2);
        assert_eq!(timeline.slides()[1].duration, 7.0);
        assert_eq!(timeline.total_duration(), 12.0);
    }

    #[test]
    fn test_extend_noop_when_long_enough() {
        let slides = vec![slide("A", 5.0)];
        let mut timeline = Timeline::compose(ResolutionProfile::Landscape, slides, blank());

        timeline.extend_last_to(3.0);
        assert_eq!(timeline.total_duration(), 5.0);
    }
}
