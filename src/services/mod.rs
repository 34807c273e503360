//! Optimizer core: selection, scoring, execution and reporting.

pub mod aggregator;
pub mod bandit;
pub mod catalog;
pub mod metrics;
pub mod optimizer;
pub mod replay;
pub mod scorer;

pub use aggregator::{Aggregator, InputBest, InputRanking, RankedArm};
pub use bandit::{clamp_reward, ArmStats, Ucb1};
pub use catalog::{build_arms, catalog_from_config, ArmCatalog};
pub use metrics::{FuzzyAccuracy, SimpleCoherence};
pub use optimizer::{ArmScore, BanditSnapshot, BestArmForInput, Optimizer, TopArmsForInput};
pub use replay::ReplayStore;
pub use scorer::{ScoreBreakdown, Scorer, ScoringWeights};
