//! CLI entry-point for a full wine analysis.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

use crate::{
    cli::format_sources,
    config::Settings,
    pipeline::{AnalysisReport, Pipeline},
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Wine to analyse, e.g. "Chateau Margaux 2018".
    pub wine: String,
    /// Where to write the SVG chart (defaults to the outputs dir).
    #[arg(long)]
    pub chart: Option<PathBuf>,
    /// Print the full report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
    /// Also print the raw review text that was scored.
    #[arg(long)]
    pub show_notes: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let report = pipeline.analyze(&args.wine).await?;

    let chart_path = args
        .chart
        .clone()
        .unwrap_or_else(|| settings.join_output(format!("{}.svg", slugify(&report.wine))));
    write_chart(&chart_path, &report.chart_svg)?;
    info!(path = %chart_path.display(), "wrote chart");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", summary(&report, args.show_notes));
        println!("Chart: {}", chart_path.display());
    }
    Ok(())
}

fn write_chart(path: &Path, svg: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent:?}"))?;
    }
    std::fs::write(path, svg).with_context(|| format!("write chart {path:?}"))
}

/// Human-readable report: scores, optional raw notes, citations.
pub fn summary(report: &AnalysisReport, show_notes: bool) -> String {
    let mut out = format!("{} ({})\n", report.wine, report.result.wine_type);
    for (dimension, score) in report.result.scores.iter() {
        out.push_str(&format!(
            "  {:<11} {:>2}  {}\n",
            dimension.name(),
            score,
            "#".repeat(usize::from(score))
        ));
    }
    if show_notes {
        out.push_str("\nRaw review text:\n");
        out.push_str(report.reviews.review_text().combined().as_str());
        out.push('\n');
    }
    if !report.reviews.sources.is_empty() {
        out.push_str("\nSources used for this analysis:\n");
        out.push_str(&format_sources(&report.reviews.sources));
        out.push('\n');
    }
    out
}

/// File-name friendly form of a wine name.
pub fn slugify(name: &str) -> String {
    static NON_WORD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex"));
    let slug = NON_WORD
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string();
    if slug.is_empty() {
        "wine".to_string()
    } else {
        slug
    }
}
