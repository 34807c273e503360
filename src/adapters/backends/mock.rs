//! Mock backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::GenerationError;
use crate::domain::models::{Generation, Params, Usage};
use crate::domain::ports::GenerationBackend;

type Responder = dyn Fn(&str, &Params) -> Result<Generation, GenerationError> + Send + Sync;

/// Scripted backend that counts its invocations.
pub struct MockBackend {
    responder: Arc<Responder>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockBackend {
    /// Answer every prompt with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &Params) -> Result<Generation, GenerationError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Same output and usage for every prompt.
    pub fn constant(output: impl Into<String>, usage: Usage) -> Self {
        let generation = Generation::new(output, usage);
        Self::new(move |_, _| Ok(generation.clone()))
    }

    /// Fail every call with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::new(move |_, _| Err(error.clone()))
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn backend_id(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, params: &Params) -> Result<Generation, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt, params)
    }
}
