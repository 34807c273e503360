//! Prompt Bandit - UCB1 optimizer for prompt templates and sampling parameters
//!
//! Every candidate configuration (an "arm": a prompt template plus
//! temperature, max_tokens and top_p) is tried against (input, reference)
//! pairs. A UCB1 bandit decides which arm to try next; each output is scored
//! on accuracy, coherence and token cost; every round is recorded so the best
//! arm overall and per input can be reported afterwards.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): bandit, scorer, executor, aggregation
//! - **Adapters** (`adapters`): generation backends and the generation cache
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use prompt_bandit::adapters::backends::SimulatedBackend;
//! use prompt_bandit::domain::models::{CatalogConfig, Dataset, ScoringConfig};
//! use prompt_bandit::services::{catalog_from_config, Optimizer, Scorer};
//!
//! # async fn demo() -> Result<(), prompt_bandit::OptimizerError> {
//! let dataset = Dataset::demo();
//! let catalog = catalog_from_config(&CatalogConfig::default())?;
//! let backend = Arc::new(SimulatedBackend::new(0).with_answer_key(&dataset));
//! let optimizer = Optimizer::new(catalog, backend, Scorer::from_config(&ScoringConfig::default())?)?;
//!
//! optimizer.fit_stream(&dataset, 3, None).await?;
//! println!("best arm: {}", optimizer.best_arm_overall().await.id);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Arm, ArmMetadata, Config, Dataset, Example, Params, Trial, Usage};
pub use domain::ports::{AccuracyMetric, CoherenceMetric, GenerationBackend};
pub use domain::{GenerationError, OptimizerError, OptimizerResult, TemplateError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Aggregator, ArmCatalog, Optimizer, ReplayStore, Scorer, ScoringWeights, Ucb1};
