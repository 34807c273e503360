//! Reporting views derived from the replay log.
//!
//! Everything is recomputed from the full history on each call. Means are
//! taken over raw (unclamped) trial scores. Ties between arms always go to
//! the arm that comes first in the catalog.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::models::Arm;
use crate::services::catalog::ArmCatalog;
use crate::services::replay::ReplayStore;

/// An arm with its mean score over some subset of trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArm<'a> {
    pub arm: &'a Arm,
    pub mean_score: f64,
    pub trials: usize,
}

/// Best arm for one distinct input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputBest<'a> {
    pub input: &'a str,
    pub best: RankedArm<'a>,
}

/// Top arms for one distinct input, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRanking<'a> {
    pub input: &'a str,
    pub ranked: Vec<RankedArm<'a>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accum {
    sum: f64,
    count: usize,
}

impl Accum {
    fn push(&mut self, score: f64) {
        self.sum += score;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per-input score accumulators, inputs in first-seen order, arms indexed
/// by catalog position.
struct InputGroups<'a> {
    order: Vec<&'a str>,
    groups: HashMap<&'a str, Vec<Accum>>,
}

/// Read-only view over a catalog and its replay history.
pub struct Aggregator<'a> {
    catalog: &'a ArmCatalog,
    replay: &'a ReplayStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a ArmCatalog, replay: &'a ReplayStore) -> Self {
        Self { catalog, replay }
    }

    /// Arm with the highest mean score across all trials.
    ///
    /// With no history there is no signal; the first catalog arm is returned.
    pub fn best_arm_overall(&self) -> &'a Arm {
        self.arm_leaderboard()
            .into_iter()
            .next()
            .map_or_else(|| self.catalog.first(), |r| r.arm)
    }

    /// Mean score of every tried arm, best first.
    pub fn arm_leaderboard(&self) -> Vec<RankedArm<'a>> {
        let mut per_arm = vec![Accum::default(); self.catalog.len()];
        for trial in self.replay {
            if let Some(pos) = self.catalog.position(&trial.arm_id) {
                per_arm[pos].push(trial.score);
            }
        }
        self.rank(&per_arm)
    }

    /// For each distinct input (first-seen order), the arm with the highest
    /// mean score on that input.
    pub fn best_arm_per_input(&self) -> Vec<InputBest<'a>> {
        let InputGroups { order, groups } = self.group_by_input();
        order
            .into_iter()
            .filter_map(|input| {
                let best = self.rank(&groups[input]).into_iter().next()?;
                Some(InputBest { input, best })
            })
            .collect()
    }

    /// For each distinct input, up to `k` arms by descending mean score.
    pub fn topk_arms_per_input(&self, k: usize) -> Vec<InputRanking<'a>> {
        let InputGroups { order, groups } = self.group_by_input();
        order
            .into_iter()
            .map(|input| {
                let mut ranked = self.rank(&groups[input]);
                ranked.truncate(k);
                InputRanking { input, ranked }
            })
            .collect()
    }

    fn group_by_input(&self) -> InputGroups<'a> {
        let mut order = Vec::new();
        let mut groups: HashMap<&'a str, Vec<Accum>> = HashMap::new();
        let replay: &'a ReplayStore = self.replay;
        for trial in replay {
            let Some(pos) = self.catalog.position(&trial.arm_id) else {
                continue;
            };
            let input = trial.input.as_str();
            let accums = groups.entry(input).or_insert_with(|| {
                order.push(input);
                vec![Accum::default(); self.catalog.len()]
            });
            accums[pos].push(trial.score);
        }
        InputGroups { order, groups }
    }

    /// Tried arms sorted by mean descending, catalog order on ties.
    fn rank(&self, per_arm: &[Accum]) -> Vec<RankedArm<'a>> {
        let catalog: &'a ArmCatalog = self.catalog;
        let mut ranked: Vec<(usize, RankedArm<'a>)> = per_arm
            .iter()
            .enumerate()
            .filter(|(_, acc)| acc.count > 0)
            .map(|(pos, acc)| {
                (
                    pos,
                    RankedArm {
                        arm: &catalog.arms()[pos],
                        mean_score: acc.mean(),
                        trials: acc.count,
                    },
                )
            })
            .collect();
        ranked.sort_by(|(pa, a), (pb, b)| {
            b.mean_score
                .total_cmp(&a.mean_score)
                .then_with(|| pa.cmp(pb))
        });
        ranked.into_iter().map(|(_, r)| r).collect()
    }
}
