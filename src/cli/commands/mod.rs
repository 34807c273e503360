//! CLI command implementations.

pub mod arms;
pub mod run;
