//! Backend factory.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::domain::errors::GenerationError;
use crate::domain::models::{BackendConfig, BackendKind, Dataset};
use crate::domain::ports::GenerationBackend;

use super::openai::{OpenAiBackend, OpenAiConfig};
use super::simulated::SimulatedBackend;

/// Builds the configured generation backend.
pub struct BackendRegistry;

impl BackendRegistry {
    /// Create a backend by kind.
    ///
    /// `answer_key` gives the simulator the gold answers it may reproduce; the
    /// HTTP backend ignores it.
    pub fn create(
        config: &BackendConfig,
        answer_key: &Dataset,
    ) -> Result<Arc<dyn GenerationBackend>, GenerationError> {
        let backend: Arc<dyn GenerationBackend> = match config.kind {
            BackendKind::Simulated => Arc::new(
                SimulatedBackend::new(config.simulated_seed)
                    .with_answer_key(answer_key)
                    .with_latency(Duration::from_millis(config.simulated_latency_ms)),
            ),
            BackendKind::OpenAi => {
                let openai = OpenAiConfig::from(config);
                if openai.api_key.is_none() {
                    return Err(GenerationError::NotConfigured(
                        "OPENAI_API_KEY not set".to_string(),
                    ));
                }
                Arc::new(OpenAiBackend::new(openai)?)
            }
        };
        info!(backend = backend.backend_id(), "generation backend ready");
        Ok(backend)
    }
}
