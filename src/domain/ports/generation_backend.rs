//! Generation backend port - interface for text-generation services.

use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::domain::models::{Generation, Params};

/// Turns a rendered prompt plus sampling parameters into output text and a
/// usage report.
///
/// # Implementations
///
/// - **SimulatedBackend**: offline, seeded quality curve (no network)
/// - **OpenAiBackend**: OpenAI-compatible chat completions over HTTP
/// - **MockBackend**: scripted responses with an invocation counter
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the generation cache may call them
/// from concurrent tokio tasks.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short identifier used in logs (e.g. "simulated", "openai").
    fn backend_id(&self) -> &str;

    /// Generate output for `prompt`.
    ///
    /// Resolves only once a result or an error is available. Every failure is
    /// reported as a [`GenerationError`].
    async fn generate(&self, prompt: &str, params: &Params) -> Result<Generation, GenerationError>;
}
