//! UCB1 bandit for arm selection.
//!
//! Each arm is pulled once in catalog order (cold start). After that the arm
//! with the highest upper confidence bound
//!
//! ```text
//!   ucb(a) = mean(a) + sqrt(2 * ln(t) / pulls(a))
//! ```
//!
//! is chosen, where `t` is the round counter after incrementing for the
//! current selection. Ties go to the earliest arm in catalog order.
//!
//! Rewards are clamped to `[0, 1]` before they are accumulated, so an
//! unbounded business score can never push the statistics outside the range
//! UCB1 assumes.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::errors::{OptimizerError, OptimizerResult};

/// Pull statistics for one arm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmStats {
    pub arm_id: String,
    pub pulls: u64,
    pub total_reward: f64,
}

impl ArmStats {
    fn new(arm_id: String) -> Self {
        Self {
            arm_id,
            pulls: 0,
            total_reward: 0.0,
        }
    }

    /// Mean clamped reward, 0 when never pulled.
    pub fn mean_reward(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_reward / self.pulls as f64
        }
    }

    fn ucb(&self, t: u64) -> f64 {
        let bonus = (2.0 * (t as f64).ln() / self.pulls as f64).sqrt();
        self.mean_reward() + bonus
    }
}

/// Clamp a raw score into the reward range.
///
/// Non-finite scores count as zero reward.
pub fn clamp_reward(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// UCB1 selector state. Owned by one optimizer; never global.
#[derive(Debug, Clone)]
pub struct Ucb1 {
    stats: Vec<ArmStats>,
    index: HashMap<String, usize>,
    t: u64,
}

impl Ucb1 {
    /// Create a selector over `arm_ids` in catalog order.
    pub fn new<I, S>(arm_ids: I) -> OptimizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stats = Vec::new();
        let mut index = HashMap::new();
        for id in arm_ids {
            let id = id.into();
            if index.insert(id.clone(), stats.len()).is_some() {
                return Err(OptimizerError::DuplicateArmId(id));
            }
            stats.push(ArmStats::new(id));
        }
        if stats.is_empty() {
            return Err(OptimizerError::EmptyCatalog);
        }
        Ok(Self { stats, index, t: 0 })
    }

    /// Advance the round counter and choose the next arm.
    pub fn select(&mut self) -> &str {
        self.t += 1;
        let idx = self.choose(self.t);
        &self.stats[idx].arm_id
    }

    /// The arm the next [`select`](Self::select) would return, without
    /// advancing any state.
    pub fn peek(&self) -> &str {
        &self.stats[self.choose(self.t + 1)].arm_id
    }

    fn choose(&self, t: u64) -> usize {
        if let Some(cold) = self.stats.iter().position(|s| s.pulls == 0) {
            return cold;
        }

        let mut best = 0;
        let mut best_ucb = f64::NEG_INFINITY;
        for (i, s) in self.stats.iter().enumerate() {
            let ucb = s.ucb(t);
            // Strict comparison keeps the earliest arm on ties.
            if ucb > best_ucb {
                best_ucb = ucb;
                best = i;
            }
        }
        best
    }

    /// Record feedback for `arm_id`. The reward is clamped to `[0, 1]`.
    pub fn update(&mut self, arm_id: &str, reward: f64) -> OptimizerResult<()> {
        let idx = *self
            .index
            .get(arm_id)
            .ok_or_else(|| OptimizerError::UnknownArm(arm_id.to_string()))?;
        let s = &mut self.stats[idx];
        s.pulls = s.pulls.saturating_add(1);
        s.total_reward += clamp_reward(reward);
        Ok(())
    }

    /// Round counter.
    pub fn rounds(&self) -> u64 {
        self.t
    }

    /// Per-arm statistics in catalog order.
    pub fn stats(&self) -> &[ArmStats] {
        &self.stats
    }

    pub fn stats_for(&self, arm_id: &str) -> Option<&ArmStats> {
        self.index.get(arm_id).map(|&i| &self.stats[i])
    }

    /// Sum of pulls over all arms.
    pub fn total_pulls(&self) -> u64 {
        self.stats.iter().map(|s| s.pulls).sum()
    }
}
