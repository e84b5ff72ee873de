//! Parsing of the model's JSON reply.

use thiserror::Error;

use crate::model::AnalysisResult;

/// The reply could not be turned into an [`AnalysisResult`].
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("model reply was empty")]
    Empty,
    #[error("model reply is not valid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remove one surrounding markdown code fence (optionally tagged `json`).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim()
}

/// Parse a model reply, tolerating a surrounding code fence.
pub fn parse_reply(raw: &str) -> Result<AnalysisResult, ReplyError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ReplyError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}
