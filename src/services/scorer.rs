//! Combines accuracy, coherence, and cost into one score.
//!
//! The combined score is deliberately unbounded: cost can push it below zero.
//! Clamping into a reward happens in the bandit, not here.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::{OptimizerError, OptimizerResult};
use crate::domain::models::{ScoringConfig, Usage};
use crate::domain::ports::{AccuracyMetric, CoherenceMetric};
use crate::services::metrics::{FuzzyAccuracy, SimpleCoherence};

/// Non-negative scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub accuracy: f64,
    pub coherence: f64,
    pub cost: f64,
}

impl ScoringWeights {
    /// Validate and build weights.
    pub fn new(accuracy: f64, coherence: f64, cost: f64) -> OptimizerResult<Self> {
        for (name, value) in [("accuracy", accuracy), ("coherence", coherence), ("cost", cost)] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizerError::InvalidWeight { name, value });
            }
        }
        Ok(Self {
            accuracy,
            coherence,
            cost,
        })
    }
}

/// Per-round sub-metrics and the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub accuracy: f64,
    pub coherence: f64,
    pub cost: f64,
    pub score: f64,
}

/// Stateless scoring function with fixed weights.
#[derive(Clone)]
pub struct Scorer {
    weights: ScoringWeights,
    tokens_per_cost_unit: f64,
    accuracy: Arc<dyn AccuracyMetric>,
    coherence: Arc<dyn CoherenceMetric>,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("weights", &self.weights)
            .field("tokens_per_cost_unit", &self.tokens_per_cost_unit)
            .finish_non_exhaustive()
    }
}

impl Scorer {
    /// Scorer with the default fuzzy accuracy and simple coherence metrics,
    /// charging one cost unit per 1000 tokens.
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            tokens_per_cost_unit: 1000.0,
            accuracy: Arc::new(FuzzyAccuracy),
            coherence: Arc::new(SimpleCoherence),
        }
    }

    pub fn from_config(config: &ScoringConfig) -> OptimizerResult<Self> {
        let weights = ScoringWeights::new(
            config.accuracy_weight,
            config.coherence_weight,
            config.cost_weight,
        )?;
        Ok(Self::new(weights).with_tokens_per_cost_unit(config.tokens_per_cost_unit))
    }

    pub fn with_tokens_per_cost_unit(mut self, tokens: u32) -> Self {
        self.tokens_per_cost_unit = f64::from(tokens.max(1));
        self
    }

    pub fn with_accuracy_metric(mut self, metric: Arc<dyn AccuracyMetric>) -> Self {
        self.accuracy = metric;
        self
    }

    pub fn with_coherence_metric(mut self, metric: Arc<dyn CoherenceMetric>) -> Self {
        self.coherence = metric;
        self
    }

    /// Cost of a usage report in cost units.
    pub fn cost(&self, usage: &Usage) -> f64 {
        usage.total_tokens() as f64 / self.tokens_per_cost_unit
    }

    pub fn score(&self, prediction: &str, reference: &str, usage: &Usage) -> ScoreBreakdown {
        let accuracy = self.accuracy.accuracy(prediction, reference);
        let coherence = self.coherence.coherence(prediction);
        let cost = self.cost(usage);
        let w = self.weights;
        ScoreBreakdown {
            accuracy,
            coherence,
            cost,
            score: w.accuracy * accuracy + w.coherence * coherence - w.cost * cost,
        }
    }
}
