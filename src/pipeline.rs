//! End-to-end analysis: gather reviews, score them, draw the chart.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    chart::{self, RadarChart, SvgError},
    config::Settings,
    data::{
        community::{CellarTrackerClient, NotesSource},
        search::{WebReviewAggregator, WebReviews},
    },
    model::{AnalysisResult, Source},
    scoring::{prompt::ReviewText, ScoringClient, ScoringError},
};

/// Request lifecycle stages, logged as the pipeline advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Scoring,
    Rendering,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Scoring => "scoring",
            Stage::Rendering => "rendering",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why an analysis did not produce a chart.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("wine name is empty")]
    EmptyWineName,
    #[error("No reviews found. Try a different wine name.")]
    NoReviewsFound,
    #[error("Something went wrong analysing the wine: {0}")]
    Scoring(#[from] ScoringError),
    #[error("could not render chart: {0}")]
    Render(#[from] SvgError),
}

impl AnalysisError {
    /// Stage the request was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            AnalysisError::EmptyWineName => Stage::Idle,
            AnalysisError::NoReviewsFound => Stage::Fetching,
            AnalysisError::Scoring(_) => Stage::Scoring,
            AnalysisError::Render(_) => Stage::Rendering,
        }
    }
}

/// Review text collected for one wine before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatheredReviews {
    pub web_text: String,
    pub community_notes: String,
    pub sources: Vec<Source>,
}

impl GatheredReviews {
    pub fn is_empty(&self) -> bool {
        self.web_text.trim().is_empty() && self.community_notes.trim().is_empty()
    }

    pub fn review_text(&self) -> ReviewText<'_> {
        ReviewText {
            web: &self.web_text,
            community: &self.community_notes,
        }
    }
}

/// Everything a shell needs to display a finished analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub wine: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub reviews: GatheredReviews,
    pub chart: RadarChart,
    pub chart_svg: String,
    pub generated_at: DateTime<Utc>,
}

/// The review-aggregation-and-scoring pipeline.
#[derive(Clone)]
pub struct Pipeline {
    web: WebReviewAggregator,
    community: Arc<dyn NotesSource>,
    scorer: ScoringClient,
}

impl Pipeline {
    pub fn new(
        web: WebReviewAggregator,
        community: Arc<dyn NotesSource>,
        scorer: ScoringClient,
    ) -> Self {
        Self {
            web,
            community,
            scorer,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(
            WebReviewAggregator::from_settings(settings)?,
            Arc::new(CellarTrackerClient::from_settings(settings)?),
            ScoringClient::from_settings(settings)?,
        ))
    }

    /// Run the web aggregator and the community fetcher concurrently.
    #[instrument(skip(self))]
    pub async fn gather(&self, wine: &str) -> GatheredReviews {
        let (web, notes): (WebReviews, _) =
            tokio::join!(self.web.gather(wine), self.community.notes(wine));
        GatheredReviews {
            web_text: web.text(),
            community_notes: notes.unwrap_or_empty(),
            sources: web.sources,
        }
    }

    /// Full analysis of `wine`.
    #[instrument(skip(self))]
    pub async fn analyze(&self, wine: &str) -> Result<AnalysisReport, AnalysisError> {
        let outcome = self.run(wine).await;
        match &outcome {
            Ok(_) => info!(wine, stage = %Stage::Done, "analysis finished"),
            Err(err) => warn!(wine, stage = %Stage::Failed, from = %err.stage(), %err, "analysis failed"),
        }
        outcome
    }

    async fn run(&self, wine: &str) -> Result<AnalysisReport, AnalysisError> {
        let wine = wine.trim();
        if wine.is_empty() {
            return Err(AnalysisError::EmptyWineName);
        }

        info!(wine, stage = %Stage::Fetching, "gathering reviews");
        let reviews = self.gather(wine).await;
        if reviews.is_empty() {
            return Err(AnalysisError::NoReviewsFound);
        }

        info!(wine, stage = %Stage::Scoring, sources = reviews.sources.len(), "scoring reviews");
        let result = self.scorer.score(wine, reviews.review_text()).await?;

        info!(wine, stage = %Stage::Rendering, "rendering chart");
        let chart = chart::render(wine, &result.wine_type, &result.scores);
        let chart_svg = chart.to_svg()?;

        Ok(AnalysisReport {
            wine: wine.to_string(),
            result,
            reviews,
            chart,
            chart_svg,
            generated_at: Utc::now(),
        })
    }
}
