//! `run`: train the bandit over a dataset and report the winners.

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::adapters::backends::BackendRegistry;
use crate::cli::display::{colorize_cached, colorize_score, list_table, render_list, section};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, Dataset, Example, RunConfig, Trial};
use crate::services::{
    catalog_from_config, ArmScore, BanditSnapshot, BestArmForInput, Optimizer, Scorer,
    TopArmsForInput,
};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Passes over the dataset
    #[arg(short, long)]
    pub epochs: Option<u32>,

    /// Seed for epoch shuffling
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Dataset file (YAML or JSON); the built-in demo set when omitted
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Arms to report per input
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Keep dataset order instead of shuffling each epoch
    #[arg(long)]
    pub no_shuffle: bool,

    /// Extra question to answer with one more round after training
    #[arg(long, requires = "probe_reference")]
    pub probe_input: Option<String>,

    /// Reference answer for --probe-input
    #[arg(long, requires = "probe_input")]
    pub probe_reference: Option<String>,

    /// Include every trial in the output
    #[arg(long)]
    pub show_trials: bool,
}

impl RunArgs {
    fn probe(&self) -> Option<Example> {
        match (&self.probe_input, &self.probe_reference) {
            (Some(input), Some(reference)) => Some(Example::new(input, reference)),
            _ => None,
        }
    }

    /// Command-line flags override the `run` config section.
    pub fn apply(&self, mut run: RunConfig) -> RunConfig {
        if let Some(epochs) = self.epochs {
            run.epochs = epochs;
        }
        if self.seed.is_some() {
            run.seed = self.seed;
        }
        if self.dataset.is_some() {
            run.dataset.clone_from(&self.dataset);
        }
        if let Some(top_k) = self.top_k {
            run.top_k = top_k;
        }
        if self.no_shuffle {
            run.shuffle = false;
        }
        run
    }
}

#[derive(Debug, Serialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub rounds: usize,
    pub mean_score: f64,
    pub cache_hits: usize,
}

impl EpochSummary {
    fn new(epoch: usize, trials: &[Trial]) -> Self {
        let mean_score = if trials.is_empty() {
            0.0
        } else {
            trials.iter().map(|t| t.score).sum::<f64>() / trials.len() as f64
        };
        Self {
            epoch,
            rounds: trials.len(),
            mean_score,
            cache_hits: trials.iter().filter(|t| t.cached).count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BestOverall {
    pub arm_id: String,
    pub phrasing: String,
    pub temperature: f64,
    pub mean_score: Option<f64>,
    pub prompt_preview: String,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub backend: String,
    pub seed: u64,
    pub epochs: Vec<EpochSummary>,
    pub best_per_input: Vec<BestArmForInput>,
    pub top_k: Vec<TopArmsForInput>,
    pub best_overall: BestOverall,
    pub bandit: BanditSnapshot,
    pub cache_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<Trial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<Vec<Trial>>,
}

fn arm_cell(score: &ArmScore) -> String {
    format!(
        "{} ({}, T={:.1})",
        score.arm.id,
        score.arm.metadata.phrasing_or_default(),
        score.arm.params.temperature
    )
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut out = Vec::new();

        let mut epochs = list_table(&["epoch", "rounds", "mean score", "cache hits"]);
        for e in &self.epochs {
            epochs.add_row(vec![
                e.epoch.to_string(),
                e.rounds.to_string(),
                colorize_score(e.mean_score).to_string(),
                e.cache_hits.to_string(),
            ]);
        }
        out.push(format!(
            "Backend {} (seed {})\n{}",
            self.backend,
            self.seed,
            render_list("epoch", &epochs, self.epochs.len())
        ));

        out.push(section("Best arm per input"));
        let mut best = list_table(&["input", "arm", "mean score", "trials"]);
        for row in &self.best_per_input {
            best.add_row(vec![
                truncate(&row.input, 40),
                arm_cell(&row.best),
                colorize_score(row.best.mean_score).to_string(),
                row.best.trials.to_string(),
            ]);
        }
        out.push(best.to_string());

        out.push(section("Top arms per input"));
        for row in &self.top_k {
            let mut table = list_table(&["rank", "arm", "mean score"]);
            for (rank, ranked) in row.ranked.iter().enumerate() {
                table.add_row(vec![
                    (rank + 1).to_string(),
                    arm_cell(ranked),
                    colorize_score(ranked.mean_score).to_string(),
                ]);
            }
            out.push(format!("{}\n{table}", truncate(&row.input, 60)));
        }

        out.push(section("Best arm overall"));
        let b = &self.best_overall;
        out.push(format!(
            "{} ({}, T={:.1}) mean score {}\n\nPrompt preview:\n{}",
            b.arm_id,
            b.phrasing,
            b.temperature,
            b.mean_score
                .map_or_else(|| "n/a".to_string(), |s| colorize_score(s).to_string()),
            b.prompt_preview
        ));

        out.push(section("Bandit state"));
        let mut bandit = list_table(&["arm", "pulls", "mean reward"]);
        for s in &self.bandit.arms {
            bandit.add_row(vec![
                s.arm_id.clone(),
                s.pulls.to_string(),
                format!("{:.3}", s.mean_reward()),
            ]);
        }
        out.push(format!(
            "{} rounds, {} cached generations\n{bandit}",
            self.bandit.rounds, self.cache_entries
        ));

        if let Some(probe) = &self.probe {
            out.push(section("Probe"));
            out.push(format!(
                "{} -> {} via {} (accuracy {:.2}, score {})",
                probe.input,
                probe.output,
                probe.arm_id,
                probe.accuracy,
                colorize_score(probe.score)
            ));
        }

        if let Some(trials) = &self.trials {
            out.push(section("Trials"));
            let mut table = list_table(&["#", "input", "arm", "output", "score", "cache"]);
            for (i, t) in trials.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    truncate(&t.input, 30),
                    t.arm_id.clone(),
                    truncate(&t.output, 30),
                    colorize_score(t.score).to_string(),
                    colorize_cached(t.cached).to_string(),
                ]);
            }
            out.push(table.to_string());
        }

        out.join("\n")
    }
}

pub async fn execute(args: RunArgs, config: &Config, json_mode: bool) -> Result<()> {
    let result = train(&args, config).await?;
    output(&result, json_mode);
    Ok(())
}

/// Train over the dataset, snapshot the reports, then run the probe round.
async fn train(args: &RunArgs, config: &Config) -> Result<RunOutput> {
    let run = args.apply(config.run.clone());

    let dataset = match &run.dataset {
        Some(path) => Dataset::load(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?,
        None => Dataset::demo(),
    };
    let Some(first) = dataset.examples().first() else {
        anyhow::bail!("Dataset is empty");
    };
    let probe_example = args.probe();
    let answer_key = match &probe_example {
        Some(example) => dataset.clone().with_example(example.clone()),
        None => dataset.clone(),
    };

    let catalog = catalog_from_config(&config.catalog).context("Failed to build arm catalog")?;
    let backend = BackendRegistry::create(&config.backend, &answer_key)
        .context("Failed to create generation backend")?;
    let backend_id = backend.backend_id().to_string();
    let scorer = Scorer::from_config(&config.scoring)?;
    let optimizer = Optimizer::new(catalog, backend, scorer)?
        .with_timeout(Duration::from_secs(config.backend.timeout_secs));

    let seed = run.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, epochs = run.epochs, examples = dataset.len(), "starting run");

    let history = optimizer
        .fit_stream(&dataset, run.epochs as usize, run.shuffle.then_some(&mut rng))
        .await
        .context("Optimization aborted")?;

    let best_arm = optimizer.best_arm_overall().await;
    let best_mean = optimizer
        .arm_leaderboard()
        .await
        .into_iter()
        .find(|r| r.arm.id == best_arm.id)
        .map(|r| r.mean_score);
    let best_overall = BestOverall {
        arm_id: best_arm.id.clone(),
        phrasing: best_arm.metadata.phrasing_or_default().to_string(),
        temperature: best_arm.params.temperature,
        mean_score: best_mean,
        prompt_preview: best_arm.render(&first.input)?,
    };

    let mut result = RunOutput {
        backend: backend_id,
        seed,
        epochs: history
            .iter()
            .enumerate()
            .map(|(i, trials)| EpochSummary::new(i + 1, trials))
            .collect(),
        best_per_input: optimizer.best_arm_per_input().await,
        top_k: optimizer.topk_arms_per_input(run.top_k).await,
        best_overall,
        bandit: optimizer.bandit_snapshot().await,
        cache_entries: optimizer.cache_len().await,
        probe: None,
        trials: if args.show_trials {
            Some(optimizer.trials().await)
        } else {
            None
        },
    };

    if let Some(example) = probe_example {
        result.probe = Some(
            optimizer
                .run_example(&example.input, &example.reference)
                .await
                .context("Probe round failed")?,
        );
    }

    Ok(result)
}
