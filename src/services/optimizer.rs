//! Trial executor and epoch loop.
//!
//! One call to [`Optimizer::run_example`] is one bandit round. The bandit lock
//! is held for the whole round, so rounds are serialized even when callers
//! drive the optimizer from several tasks. The selection is previewed with
//! [`Ucb1::peek`] and only committed (together with the reward) once the
//! backend has answered; a failed round leaves bandit, cache and replay
//! untouched.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::adapters::cache::{CacheKey, GenerationCache};
use crate::domain::errors::{OptimizerError, OptimizerResult};
use crate::domain::models::{Arm, Dataset, Example, Trial};
use crate::domain::ports::GenerationBackend;
use crate::services::aggregator::{Aggregator, RankedArm};
use crate::services::bandit::{ArmStats, Ucb1};
use crate::services::catalog::ArmCatalog;
use crate::services::replay::ReplayStore;
use crate::services::scorer::Scorer;

/// An arm with its mean score, detached from the replay log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmScore {
    pub arm: Arm,
    pub mean_score: f64,
    pub trials: usize,
}

impl From<RankedArm<'_>> for ArmScore {
    fn from(ranked: RankedArm<'_>) -> Self {
        Self {
            arm: ranked.arm.clone(),
            mean_score: ranked.mean_score,
            trials: ranked.trials,
        }
    }
}

/// Best arm for one distinct input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestArmForInput {
    pub input: String,
    pub best: ArmScore,
}

/// Top arms for one distinct input, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArmsForInput {
    pub input: String,
    pub ranked: Vec<ArmScore>,
}

/// Point-in-time copy of the bandit statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanditSnapshot {
    pub rounds: u64,
    pub arms: Vec<ArmStats>,
}

/// UCB1-driven prompt optimizer.
pub struct Optimizer {
    catalog: ArmCatalog,
    bandit: Mutex<Ucb1>,
    cache: GenerationCache,
    scorer: Scorer,
    replay: RwLock<ReplayStore>,
}

impl Optimizer {
    pub fn new(
        catalog: ArmCatalog,
        backend: Arc<dyn GenerationBackend>,
        scorer: Scorer,
    ) -> OptimizerResult<Self> {
        let bandit = Ucb1::new(catalog.ids())?;
        Ok(Self {
            catalog,
            bandit: Mutex::new(bandit),
            cache: GenerationCache::new(backend),
            scorer,
            replay: RwLock::new(ReplayStore::new()),
        })
    }

    /// Abandon rounds whose backend call exceeds `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.cache = self.cache.with_timeout(timeout);
        self
    }

    /// Run one bandit round on `(input, reference)`.
    pub async fn run_example(&self, input: &str, reference: &str) -> OptimizerResult<Trial> {
        let mut bandit = self.bandit.lock().await;

        let arm_id = bandit.peek().to_string();
        let arm = self
            .catalog
            .get(&arm_id)
            .ok_or_else(|| OptimizerError::UnknownArm(arm_id.clone()))?;
        let prompt = arm.render(input)?;

        let started = Instant::now();
        let lookup = self
            .cache
            .get_or_generate(CacheKey::new(input, &arm.id), &prompt, &arm.params)
            .await
            .inspect_err(|e| warn!(arm_id = %arm.id, error = %e, "generation failed, round abandoned"))?;
        let latency_secs = started.elapsed().as_secs_f64();

        let generation = lookup.generation;
        let breakdown = self
            .scorer
            .score(&generation.output, reference, &generation.usage);

        let selected = bandit.select();
        debug_assert_eq!(selected, arm.id);
        bandit.update(&arm.id, breakdown.score)?;

        let trial = Trial {
            input: input.to_string(),
            reference: reference.to_string(),
            arm_id: arm.id.clone(),
            output: generation.output.clone(),
            accuracy: breakdown.accuracy,
            coherence: breakdown.coherence,
            cost: breakdown.cost,
            score: breakdown.score,
            latency_secs,
            cached: lookup.hit,
        };
        self.replay.write().await.append(trial.clone());

        debug!(
            round = bandit.rounds(),
            arm_id = %trial.arm_id,
            cached = trial.cached,
            score = trial.score,
            latency_secs,
            "round complete"
        );
        Ok(trial)
    }

    /// Run `epochs` passes over `dataset`, one round per example.
    ///
    /// With `rng` set, each epoch visits the examples in a freshly shuffled
    /// order. The first failing round stops the loop and its error is
    /// returned; trials already recorded stay in the replay log.
    #[instrument(skip(self, dataset, rng), fields(examples = dataset.len()))]
    pub async fn fit_stream(
        &self,
        dataset: &Dataset,
        epochs: usize,
        mut rng: Option<&mut StdRng>,
    ) -> OptimizerResult<Vec<Vec<Trial>>> {
        let mut history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let mut order: Vec<&Example> = dataset.iter().collect();
            if let Some(rng) = rng.as_deref_mut() {
                order.shuffle(rng);
            }

            let mut trials = Vec::with_capacity(order.len());
            for example in order {
                trials.push(self.run_example(&example.input, &example.reference).await?);
            }

            let mean = if trials.is_empty() {
                0.0
            } else {
                trials.iter().map(|t| t.score).sum::<f64>() / trials.len() as f64
            };
            info!(epoch = epoch + 1, rounds = trials.len(), mean_score = mean, "epoch complete");
            history.push(trials);
        }
        Ok(history)
    }

    /// Arm with the highest mean score so far; the first catalog arm when
    /// nothing has run yet.
    pub async fn best_arm_overall(&self) -> Arm {
        let replay = self.replay.read().await;
        Aggregator::new(&self.catalog, &replay).best_arm_overall().clone()
    }

    pub async fn arm_leaderboard(&self) -> Vec<ArmScore> {
        let replay = self.replay.read().await;
        Aggregator::new(&self.catalog, &replay)
            .arm_leaderboard()
            .into_iter()
            .map(ArmScore::from)
            .collect()
    }

    pub async fn best_arm_per_input(&self) -> Vec<BestArmForInput> {
        let replay = self.replay.read().await;
        Aggregator::new(&self.catalog, &replay)
            .best_arm_per_input()
            .into_iter()
            .map(|b| BestArmForInput {
                input: b.input.to_string(),
                best: b.best.into(),
            })
            .collect()
    }

    pub async fn topk_arms_per_input(&self, k: usize) -> Vec<TopArmsForInput> {
        let replay = self.replay.read().await;
        Aggregator::new(&self.catalog, &replay)
            .topk_arms_per_input(k)
            .into_iter()
            .map(|r| TopArmsForInput {
                input: r.input.to_string(),
                ranked: r.ranked.into_iter().map(ArmScore::from).collect(),
            })
            .collect()
    }

    /// Copy of the replay log in execution order.
    pub async fn trials(&self) -> Vec<Trial> {
        self.replay.read().await.trials().to_vec()
    }

    pub async fn bandit_snapshot(&self) -> BanditSnapshot {
        let bandit = self.bandit.lock().await;
        BanditSnapshot {
            rounds: bandit.rounds(),
            arms: bandit.stats().to_vec(),
        }
    }

    /// Number of cached generations.
    pub async fn cache_len(&self) -> u64 {
        self.cache.len().await
    }
}
