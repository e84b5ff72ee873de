//! CLI entry-point for collecting review text without scoring it.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{cli::format_sources, config::Settings, pipeline::Pipeline};

/// Args for the `gather` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Wine to look up, e.g. "Chateau Margaux 2018".
    pub wine: String,
    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let reviews = pipeline.gather(args.wine.trim()).await;
    info!(sources = reviews.sources.len(), "gathered reviews");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reviews)?);
        return Ok(());
    }
    if reviews.is_empty() {
        println!("No reviews found. Try a different wine name.");
        return Ok(());
    }
    if !reviews.community_notes.is_empty() {
        println!("== Community notes ==\n{}\n", reviews.community_notes);
    }
    if !reviews.web_text.is_empty() {
        println!("== Web reviews ==\n{}\n", reviews.web_text);
    }
    println!("== Sources ==\n{}", format_sources(&reviews.sources));
    Ok(())
}
