//! Score coloring for CLI output.
//!
//! All coloring respects `NO_COLOR` env var automatically via the `colored` crate.

use colored::{ColoredString, Colorize};

/// Color a score: green when high, yellow in the middle, red when low or negative.
pub fn colorize_score(score: f64) -> ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.75 {
        text.green().bold()
    } else if score >= 0.4 {
        text.yellow()
    } else {
        text.red()
    }
}

pub fn colorize_cached(cached: bool) -> ColoredString {
    if cached {
        "hit".dimmed()
    } else {
        "miss".white()
    }
}
