//! Domain models.

pub mod arm;
pub mod config;
pub mod dataset;
pub mod trial;

pub use arm::{Arm, ArmMetadata, Params, INPUT_PLACEHOLDER};
pub use config::{
    BackendConfig, BackendKind, CatalogConfig, Config, LoggingConfig, RunConfig, ScoringConfig,
};
pub use dataset::{Dataset, Example};
pub use trial::{Generation, Trial, Usage};
