//! # Export Module
//!
//! Encodes finalized timelines to video files with collision-free naming,
//! plus the retention sweep for generated outputs.

pub mod encoder;
pub mod retention;

pub use encoder::{output_token, RenderedVideo, VideoExporter};
pub use retention::{sweep, RetentionPolicy, SweepStats};
