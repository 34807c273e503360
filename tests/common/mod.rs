//! Common test utilities for integration tests
//!
//! Shared fixtures: a scripted two-arm catalog and backends keyed on the
//! arm's template prefix.

use std::sync::Arc;

use prompt_bandit::adapters::backends::MockBackend;
use prompt_bandit::domain::models::{Arm, Generation, Params, Usage};
use prompt_bandit::services::{ArmCatalog, Scorer, ScoringWeights};

#[allow(dead_code)]
/// Template prefix of the arm that always answers correctly.
pub const GOOD_PREFIX: &str = "Answer precisely:";

#[allow(dead_code)]
/// Two arms: `arm_0` answers correctly, `arm_1` does not.
pub fn two_arm_catalog() -> ArmCatalog {
    ArmCatalog::new(vec![
        Arm::new("arm_0", format!("{GOOD_PREFIX} {{input}}"), Params::new(0.0, 64, 1.0)),
        Arm::new("arm_1", "Guess wildly: {input}", Params::new(0.7, 64, 1.0)),
    ])
    .expect("valid catalog")
}

#[allow(dead_code)]
/// Backend that answers `correct` for the good arm and `wrong` otherwise.
pub fn scripted_backend(correct: &'static str, wrong: &'static str) -> Arc<MockBackend> {
    Arc::new(MockBackend::new(move |prompt, _| {
        let output = if prompt.starts_with(GOOD_PREFIX) { correct } else { wrong };
        Ok(Generation::new(output, Usage::new(12, 3)))
    }))
}

#[allow(dead_code)]
/// Default weights: 0.9 accuracy, 0.1 coherence, 0.01 cost.
pub fn default_scorer() -> Scorer {
    Scorer::new(ScoringWeights::new(0.9, 0.1, 0.01).expect("valid weights"))
}

#[allow(dead_code)]
/// Setup test logging
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
