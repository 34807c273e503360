//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::arms::ArmsArgs;
use crate::cli::commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(name = "prompt-bandit")]
#[command(about = "UCB1 optimizer for prompt templates and sampling parameters", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (replaces .prompt-bandit/config.yaml and local.yaml)
    #[arg(short, long, global = true, env = "PROMPT_BANDIT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the bandit over a dataset and report the best arms
    Run(RunArgs),

    /// List the arm catalog
    Arms(ArmsArgs),
}
