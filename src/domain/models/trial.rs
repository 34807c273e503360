//! Trial and generation result models.

use serde::{Deserialize, Serialize};

/// Token usage reported by a backend for one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total_tokens(&self) -> u64 {
        u64::from(self.prompt_tokens) + u64::from(self.completion_tokens)
    }
}

/// Output text and usage returned by one backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub output: String,
    pub usage: Usage,
}

impl Generation {
    pub fn new(output: impl Into<String>, usage: Usage) -> Self {
        Self {
            output: output.into(),
            usage,
        }
    }
}

/// Immutable record of one executed bandit round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub input: String,
    pub reference: String,
    pub arm_id: String,
    pub output: String,
    /// Closeness to the reference, in [0, 1]
    pub accuracy: f64,
    /// Well-formedness of the output, in [0, 1]
    pub coherence: f64,
    /// Token cost (unbounded)
    pub cost: f64,
    /// Combined weighted score (unbounded)
    pub score: f64,
    /// Wall-clock time spent obtaining the output, in seconds
    pub latency_secs: f64,
    /// Whether the output came from the generation cache
    pub cached: bool,
}
