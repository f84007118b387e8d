use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::{AudioAsset, AudioProbe, SpeechSynthesizer};
use crate::catalog::Product;
use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::export::{output_token, RenderedVideo, VideoExporter};
use crate::render::{ResolutionProfile, SlideRenderer};
use crate::timeline::{AudioSynchronizer, Timeline};

/// Structured record of a degraded-mode substitution.
///
/// The pipeline absorbs these locally (best-effort contract) but surfaces
/// each one here so callers and tests can assert on degraded runs instead of
/// scraping logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// The narration path did not resolve to a file; both profiles exported silent
    MissingAudio { path: PathBuf },

    /// The product list was empty; a single blank slide was substituted per profile
    EmptyProductList,

    /// A product carried no usable text; the placeholder caption was used
    MissingCaption { index: usize },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAudio { path } => {
                write!(f, "audio asset not found at {:?}; videos exported silent", path)
            }
            Self::EmptyProductList => {
                write!(f, "empty product list; substituted a blank slide")
            }
            Self::MissingCaption { index } => {
                write!(f, "product {} has no usable text; placeholder caption used", index)
            }
        }
    }
}

/// Result of one pipeline invocation
#[derive(Debug)]
pub struct PipelineOutput {
    /// Finished videos keyed by profile name ("landscape", "portrait")
    pub videos: HashMap<String, RenderedVideo>,

    /// Path of the narration file generated by the pipeline itself, when the
    /// narration-driven entrypoint was used
    pub audio: Option<PathBuf>,

    /// Degraded-mode substitutions that occurred during this run
    pub warnings: Vec<PipelineWarning>,
}

/// Output directory layout: one subdirectory for generated audio, one for
/// generated video, both created idempotently before any rendering work.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub video: PathBuf,
    pub audio: PathBuf,
}

impl OutputLayout {
    pub fn prepare<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let video = root.join("video");
        let audio = root.join("audio");

        for dir in [&video, &audio] {
            std::fs::create_dir_all(dir).map_err(|_| ExportError::DirectoryCreationFailed {
                path: dir.display().to_string(),
            })?;
        }

        Ok(Self { root, video, audio })
    }
}

/// Dual-profile orchestrator.
///
/// One invocation renders the same product sequence, in the same order, bound
/// to the same narration decision, for both resolution profiles. The two
/// profile exports are data-independent after timeline construction and run
/// concurrently.
pub struct PipelineEngine {
    config: Config,
    renderer: SlideRenderer,
    synchronizer: AudioSynchronizer,
}

impl PipelineEngine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let renderer = SlideRenderer::new(&config.render)?;
        let synchronizer = AudioSynchronizer::new(config.sync.policy);

        Ok(Self {
            config,
            renderer,
            synchronizer,
        })
    }

    /// Run the pipeline with a pre-existing narration file (or none).
    ///
    /// A narration path that does not resolve to a file degrades to silent
    /// output with a warning; it never aborts the run.
    pub async fn render<P: AsRef<Path>>(
        &self,
        products: &[Product],
        audio_path: Option<&Path>,
        output_dir: P,
    ) -> Result<PipelineOutput> {
        let layout = OutputLayout::prepare(output_dir)?;
        let mut warnings = product_warnings(products);

        let audio = match audio_path {
            Some(path) => {
                let probed = AudioProbe::probe_optional(path)?;
                if probed.is_none() {
                    warn!("Audio file {:?} not found. Videos will have no audio.", path);
                    warnings.push(PipelineWarning::MissingAudio {
                        path: path.to_path_buf(),
                    });
                }
                probed
            }
            None => None,
        };

        self.run(products, audio, &layout, warnings).await
    }

    /// Run the pipeline driving speech synthesis first: the script is
    /// narrated into the audio subdirectory, then both profiles are bound to
    /// the resulting asset.
    pub async fn render_with_narration<P: AsRef<Path>>(
        &self,
        products: &[Product],
        script: &str,
        lang: &str,
        synthesizer: &dyn SpeechSynthesizer,
        output_dir: P,
    ) -> Result<PipelineOutput> {
        let layout = OutputLayout::prepare(output_dir)?;
        let warnings = product_warnings(products);

        let narration_path = layout
            .audio
            .join(format!("narration_{}.mp3", output_token()));

        info!("🎙️ Synthesizing narration ({} chars, lang {})", script.len(), lang);
        let asset = synthesizer.synthesize(script, lang, &narration_path)?;

        let audio_path = asset.path.clone();
        let mut output = self.run(products, Some(asset), &layout, warnings).await?;
        output.audio = Some(audio_path);
        Ok(output)
    }

    async fn run(
        &self,
        products: &[Product],
        audio: Option<AudioAsset>,
        layout: &OutputLayout,
        warnings: Vec<PipelineWarning>,
    ) -> Result<PipelineOutput> {
        info!("🎬 Starting promo-slate pipeline");
        info!("   Products: {}", products.len());
        info!(
            "   Narration: {}",
            audio
                .as_ref()
                .map(|a| format!("{:.1}s", a.duration))
                .unwrap_or_else(|| "none".to_string())
        );
        info!("   Output: {:?}", layout.root);

        // Both profiles see the same product order and the same audio
        // binding decision
        let (landscape, portrait) = tokio::try_join!(
            self.export_profile(ResolutionProfile::Landscape, products, audio.clone(), layout),
            self.export_profile(ResolutionProfile::Portrait, products, audio.clone(), layout),
        )?;

        let mut videos = HashMap::new();
        for rendered in [landscape, portrait] {
            info!(
                "   ✅ {}: {:?} ({:.1}s)",
                rendered.profile, rendered.path, rendered.duration
            );
            videos.insert(rendered.profile.name().to_string(), rendered);
        }

        info!("🎉 Pipeline complete");

        Ok(PipelineOutput {
            videos,
            audio: None,
            warnings,
        })
    }

    async fn export_profile(
        &self,
        profile: ResolutionProfile,
        products: &[Product],
        audio: Option<AudioAsset>,
        layout: &OutputLayout,
    ) -> Result<RenderedVideo> {
        let slides = self.renderer.render_all(products, profile);
        let blank = self.renderer.blank(profile);

        let mut timeline = Timeline::compose(profile, slides, blank);
        self.synchronizer.attach(&mut timeline, audio)?;

        let mut exporter = VideoExporter::new(self.config.export.clone(), &layout.video);
        exporter.export(&timeline).await
    }
}

/// Warnings derivable from the product list alone, shared by both profiles
/// and recorded once per invocation
fn product_warnings(products: &[Product]) -> Vec<PipelineWarning> {
    let mut warnings = Vec::new();

    if products.is_empty() {
        warn!("Empty product list; substituting a blank slide per profile");
        warnings.push(PipelineWarning::EmptyProductList);
    }

    for (index, product) in products.iter().enumerate() {
        if product.is_captionless() {
            warnings.push(PipelineWarning::MissingCaption { index });
        }
    }

    warnings
}
