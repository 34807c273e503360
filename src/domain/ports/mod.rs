//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces external collaborators must implement:
//! - GenerationBackend: text generation (simulated, HTTP API, mock)
//! - AccuracyMetric / CoherenceMetric: pluggable scoring functions
//!
//! The optimizer core depends only on these traits.

pub mod generation_backend;
pub mod metrics;

pub use generation_backend::GenerationBackend;
pub use metrics::{AccuracyMetric, CoherenceMetric};
