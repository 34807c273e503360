//! Domain layer for the prompt optimizer
//!
//! This module contains the core data model, error types, and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{GenerationError, OptimizerError, OptimizerResult, TemplateError};
