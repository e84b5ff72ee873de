//! LLM scoring of aggregated review text.

pub mod claude;
pub mod prompt;
pub mod reply;
pub mod rubric;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    model::AnalysisResult,
    scoring::{
        claude::{ClaudeProvider, LlmError, LlmProvider},
        prompt::{build_prompt, ReviewText},
        reply::{parse_reply, ReplyError},
        rubric::Rubric,
    },
};

/// Why scoring produced no result.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("no review text to score")]
    NothingToScore,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    MalformedReply(#[from] ReplyError),
}

/// Turns review text into an [`AnalysisResult`] with one model call.
#[derive(Clone)]
pub struct ScoringClient {
    llm: Arc<dyn LlmProvider>,
    rubric: Rubric,
    max_tokens: u32,
}

impl ScoringClient {
    pub fn new(llm: Arc<dyn LlmProvider>, rubric: Rubric, max_tokens: u32) -> Self {
        Self {
            llm,
            rubric,
            max_tokens,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let provider = ClaudeProvider::new(
            settings.anthropic_api_key.clone(),
            settings.llm_model.clone(),
            settings.llm_timeout,
        )?;
        Ok(Self::new(
            Arc::new(provider),
            Rubric::new(settings.rubric),
            settings.llm_max_tokens,
        ))
    }

    pub fn prompt(&self, wine: &str, reviews: ReviewText<'_>) -> String {
        build_prompt(&self.rubric, wine, reviews)
    }

    /// Score `wine`. There is no retry: a single malformed reply fails.
    #[instrument(skip(self, reviews), fields(provider = self.llm.provider_name(), rubric = %self.rubric.version))]
    pub async fn score(
        &self,
        wine: &str,
        reviews: ReviewText<'_>,
    ) -> Result<AnalysisResult, ScoringError> {
        if reviews.is_empty() {
            return Err(ScoringError::NothingToScore);
        }
        let prompt = self.prompt(wine, reviews);
        let raw = self.llm.complete(&prompt, self.max_tokens).await?;
        let result = parse_reply(&raw)?;
        info!(wine, wine_type = %result.wine_type, "scored wine");
        Ok(result)
    }
}
