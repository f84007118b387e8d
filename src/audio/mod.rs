//! # Audio Module
//!
//! Narration asset probing and the seam for the external speech-synthesis
//! collaborator.

pub mod probe;
pub mod tts;

pub use probe::{AudioAsset, AudioProbe};
pub use tts::SpeechSynthesizer;
