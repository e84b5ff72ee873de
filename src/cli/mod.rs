//! Command-line interface wiring for wine-radar.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod analyze;
pub mod gather;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Score a wine from its tasting notes and draw a radar chart", long_about = None)]
pub struct Cli {
    /// Log pipeline detail (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Gather(args) => gather::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Gather reviews, score them and write a radar chart.
    Analyze(analyze::Args),
    /// Only gather review text and sources, without scoring.
    Gather(gather::Args),
    /// Serve the JSON API for an external front-end.
    Serve(serve::Args),
}

/// Numbered citation lines, one per source.
pub fn format_sources(sources: &[crate::model::Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} ({})", i + 1, s.title, s.link))
        .collect::<Vec<_>>()
        .join("\n")
}
