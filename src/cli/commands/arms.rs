//! `arms`: list the arm catalog.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Arm, Config};
use crate::services::catalog_from_config;

#[derive(Args, Debug, Default)]
pub struct ArmsArgs {
    /// Show each arm's full prompt template
    #[arg(long)]
    pub templates: bool,
}

#[derive(Debug, Serialize)]
pub struct ArmRow {
    pub id: String,
    pub phrasing: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl ArmRow {
    fn new(arm: &Arm, with_template: bool) -> Self {
        Self {
            id: arm.id.clone(),
            phrasing: arm.metadata.phrasing_or_default().to_string(),
            temperature: arm.params.temperature,
            max_tokens: arm.params.max_tokens,
            top_p: arm.params.top_p,
            template: with_template.then(|| arm.template.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArmListOutput {
    pub arms: Vec<ArmRow>,
    pub total: usize,
}

impl CommandOutput for ArmListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "phrasing", "temperature", "max_tokens", "top_p"]);
        for arm in &self.arms {
            table.add_row(vec![
                arm.id.clone(),
                arm.phrasing.clone(),
                format!("{:.2}", arm.temperature),
                arm.max_tokens.to_string(),
                format!("{:.2}", arm.top_p),
            ]);
        }
        let mut out = render_list("arm", &table, self.total);
        for arm in &self.arms {
            if let Some(template) = &arm.template {
                out.push_str(&format!("\n\n[{}]\n{template}", arm.id));
            }
        }
        out
    }
}

pub fn execute(args: ArmsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let catalog = catalog_from_config(&config.catalog).context("Failed to build arm catalog")?;
    let arms: Vec<ArmRow> = catalog
        .arms()
        .iter()
        .map(|arm| ArmRow::new(arm, args.templates))
        .collect();
    let total = arms.len();
    output(&ArmListOutput { arms, total }, json_mode);
    Ok(())
}
