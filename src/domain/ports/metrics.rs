//! Scoring metric ports.
//!
//! Both metrics are pure and deterministic and must return values in [0, 1].

/// Closeness of a prediction to the reference answer.
pub trait AccuracyMetric: Send + Sync {
    fn accuracy(&self, prediction: &str, reference: &str) -> f64;
}

/// Well-formedness of a prediction on its own.
pub trait CoherenceMetric: Send + Sync {
    fn coherence(&self, prediction: &str) -> f64;
}

impl<F> AccuracyMetric for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn accuracy(&self, prediction: &str, reference: &str) -> f64 {
        self(prediction, reference)
    }
}

impl<F> CoherenceMetric for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn coherence(&self, prediction: &str) -> f64 {
        self(prediction)
    }
}
