//! # Pipeline Module
//!
//! The dual-profile orchestrator that ties rendering, composition,
//! synchronization and export together.

pub mod engine;

pub use engine::{OutputLayout, PipelineEngine, PipelineOutput, PipelineWarning};
