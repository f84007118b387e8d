//! # Slide Rendering Module
//!
//! Turns product records into text-overlay slide frames at each target
//! resolution.

pub mod slide;
pub mod types;

pub use slide::{wrap_lines, SlideRenderer};
pub use types::{Frame, ResolutionProfile};
