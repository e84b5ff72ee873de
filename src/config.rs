//! Runtime configuration utilities for wine-radar.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};

use crate::{data::community::NotesFormat, scoring::rubric::RubricVersion};

/// Hosts known to block automated page fetches.
pub const DEFAULT_FETCH_DENYLIST: &[&str] = &["vivino.com", "cellartracker.com"];

/// Application configuration resolved from `.env` and defaults.
///
/// Each credential is optional: a component whose credential is missing
/// short-circuits to its empty or failure result instead of calling out.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Anthropic Messages API key.
    pub anthropic_api_key: Option<String>,
    /// Serper search API key.
    pub serper_api_key: Option<String>,
    /// CellarTracker account name.
    pub cellartracker_user: Option<String>,
    /// CellarTracker account password.
    pub cellartracker_pass: Option<String>,
    /// Response format requested from CellarTracker.
    pub cellartracker_format: NotesFormat,
    /// Model identifier sent with each scoring request.
    pub llm_model: String,
    /// Output token budget for the scoring reply.
    pub llm_max_tokens: u32,
    /// Scoring rubric revision used to build prompts.
    pub rubric: RubricVersion,
    /// Organic results requested per search query.
    pub results_per_query: usize,
    /// Timeout applied to search, page and community requests.
    pub fetch_timeout: Duration,
    /// Timeout applied to one scoring request.
    pub llm_timeout: Duration,
    /// Character cap for text extracted from one page.
    pub page_char_cap: usize,
    /// Page fetches allowed in flight at once.
    pub fetch_concurrency: usize,
    /// Link fragments that are never fetched in full.
    pub fetch_denylist: Vec<String>,
    /// Default folder for rendered charts.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            serper_api_key: None,
            cellartracker_user: None,
            cellartracker_pass: None,
            cellartracker_format: NotesFormat::Tab,
            llm_model: "claude-sonnet-4-6".to_string(),
            llm_max_tokens: 500,
            rubric: RubricVersion::default(),
            results_per_query: 5,
            fetch_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(60),
            page_char_cap: 3000,
            fetch_concurrency: 4,
            fetch_denylist: DEFAULT_FETCH_DENYLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            outputs_dir: PathBuf::from("./outputs"),
        }
    }
}

impl Settings {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a specific env file, ignoring the process environment.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let vars: Vec<(String, String)> = dotenvy::from_path_iter(path)
            .with_context(|| format!("open env file {path:?}"))?
            .collect::<Result<_, _>>()
            .with_context(|| format!("parse env file {path:?}"))?;
        Self::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    /// Resolve settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cellartracker_format = match get("CELLARTRACKER_FORMAT") {
            Some(raw) => raw.parse().context("CELLARTRACKER_FORMAT")?,
            None => defaults.cellartracker_format,
        };
        let rubric = match get("WINE_RUBRIC") {
            Some(raw) => raw.parse().context("WINE_RUBRIC")?,
            None => defaults.rubric,
        };
        let fetch_timeout = parse_number::<u64>(&get, "WINE_FETCH_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);
        let llm_timeout = parse_number::<u64>(&get, "WINE_LLM_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.llm_timeout);
        let fetch_concurrency =
            parse_number(&get, "WINE_FETCH_CONCURRENCY")?.unwrap_or(defaults.fetch_concurrency);
        if fetch_concurrency == 0 {
            bail!("WINE_FETCH_CONCURRENCY must be at least 1");
        }
        let fetch_denylist = get("WINE_FETCH_DENYLIST")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.fetch_denylist);

        Ok(Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            serper_api_key: get("SERPER_API_KEY"),
            cellartracker_user: get("CELLARTRACKER_USER"),
            cellartracker_pass: get("CELLARTRACKER_PASS"),
            cellartracker_format,
            llm_model: get("WINE_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_max_tokens: parse_number(&get, "WINE_LLM_MAX_TOKENS")?
                .unwrap_or(defaults.llm_max_tokens),
            rubric,
            results_per_query: parse_number(&get, "WINE_RESULTS_PER_QUERY")?
                .unwrap_or(defaults.results_per_query),
            fetch_timeout,
            llm_timeout,
            page_char_cap: parse_number(&get, "WINE_PAGE_CHAR_CAP")?
                .unwrap_or(defaults.page_char_cap),
            fetch_concurrency,
            fetch_denylist,
            outputs_dir: get("OUTPUTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.outputs_dir),
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn parse_number<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{key} is not a valid number: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert!(settings.anthropic_api_key.is_none());
        assert_eq!(settings.llm_max_tokens, 500);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(10));
        assert_eq!(settings.llm_timeout, Duration::from_secs(60));
        assert_eq!(settings.fetch_denylist, vec!["vivino.com", "cellartracker.com"]);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let settings = Settings::from_lookup(|key| match key {
            "SERPER_API_KEY" => Some("   ".into()),
            "WINE_FETCH_DENYLIST" => Some("example.org, ,wine.com".into()),
            _ => None,
        })
        .unwrap();
        assert!(settings.serper_api_key.is_none());
        assert_eq!(settings.fetch_denylist, vec!["example.org", "wine.com"]);
    }

    #[test]
    fn llm_timeout_is_configurable() {
        let settings = Settings::from_lookup(|key| {
            (key == "WINE_LLM_TIMEOUT_SECS").then(|| "90".to_string())
        })
        .unwrap();
        assert_eq!(settings.llm_timeout, Duration::from_secs(90));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Settings::from_lookup(|key| {
            (key == "WINE_LLM_MAX_TOKENS").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("WINE_LLM_MAX_TOKENS"));
    }
}
