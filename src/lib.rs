//! # promo-slate
//!
//! Turn an ordered product list and one narration track into paired
//! landscape and portrait promo videos with synchronized text-overlay
//! slides.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promo_slate::{catalog::Product, config::Config, pipeline::PipelineEngine};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = PipelineEngine::new(Config::default())?;
//!
//! let products = vec![
//!     Product::new(Some("Smart Mug".into()), None),
//!     Product::new(Some("Desk Lamp".into()), Some("Warm light".into())),
//! ];
//!
//! let output = engine
//!     .render(&products, Some(Path::new("narration.mp3")), "static/out")
//!     .await?;
//!
//! println!("landscape: {:?}", output.videos["landscape"].path);
//! println!("portrait:  {:?}", output.videos["portrait"].path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`catalog`] - Product input records and the caption fallback rule
//! - [`render`] - Slide rendering at each resolution profile
//! - [`timeline`] - Timeline composition and narration synchronization
//! - [`audio`] - Narration probing and the speech-synthesis seam
//! - [`pipeline`] - The dual-profile orchestrator
//! - [`export`] - Video encoding, output naming, retention sweep
//!
//! Every invocation renders both fixed profiles (1280x720 and 720x1280) over
//! the same product order and the same narration decision, so the two outputs
//! are semantically paired.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod render;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    catalog::Product,
    config::Config,
    error::{PipelineError, Result},
    pipeline::{PipelineEngine, PipelineOutput, PipelineWarning},
    render::ResolutionProfile,
    timeline::SyncPolicy,
};
