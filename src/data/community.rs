//! CellarTracker community tasting notes.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};
use urlencoding::encode;

use crate::{
    config::Settings,
    data::outcome::{FailureKind, Fetched, Unavailable},
};

const XLQUERY_URL: &str = "https://www.cellartracker.com/xlquery.asp";

/// Notes at or below this many characters are dropped.
pub const MIN_NOTE_CHARS: usize = 20;
/// Maximum number of notes kept per wine.
pub const MAX_NOTES: usize = 20;

const ID_COLUMN: &str = "iWine";
const NOTE_COLUMN: &str = "TastingNotes";

/// Response format requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesFormat {
    Json,
    Tab,
}

impl NotesFormat {
    fn as_param(self) -> &'static str {
        match self {
            NotesFormat::Json => "JSON",
            NotesFormat::Tab => "Tab",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown notes format {0:?}, expected json or tab")]
pub struct UnknownNotesFormat(String);

impl FromStr for NotesFormat {
    type Err = UnknownNotesFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(NotesFormat::Json),
            "tab" | "tsv" => Ok(NotesFormat::Tab),
            _ => Err(UnknownNotesFormat(s.to_string())),
        }
    }
}

/// Source of community tasting notes for a wine.
#[async_trait]
pub trait NotesSource: Send + Sync {
    async fn notes(&self, wine: &str) -> Fetched<String>;
}

#[derive(Debug, Clone)]
struct Credentials {
    user: String,
    password: String,
}

/// CellarTracker `xlquery` client.
#[derive(Debug, Clone)]
pub struct CellarTrackerClient {
    credentials: Option<Credentials>,
    format: NotesFormat,
    base_url: String,
    client: Client,
}

impl CellarTrackerClient {
    pub fn new(
        user: Option<String>,
        password: Option<String>,
        format: NotesFormat,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let credentials = match (user, password) {
            (Some(user), Some(password)) => Some(Credentials { user, password }),
            _ => None,
        };
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self {
            credentials,
            format,
            base_url: XLQUERY_URL.to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            settings.cellartracker_user.clone(),
            settings.cellartracker_pass.clone(),
            settings.cellartracker_format,
            settings.fetch_timeout,
        )
    }

    /// Point the client at another `xlquery` endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn table_url(&self, creds: &Credentials, table: &str, filter: (&str, &str)) -> String {
        format!(
            "{base}?User={user}&Password={password}&Format={format}&Table={table}&{key}={value}",
            base = self.base_url,
            user = encode(&creds.user),
            password = encode(&creds.password),
            format = self.format.as_param(),
            table = table,
            key = filter.0,
            value = encode(filter.1),
        )
    }

    async fn query_table(&self, url: &str, table: &str) -> Result<Vec<Record>, Unavailable> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Unavailable::from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Unavailable::new(
                FailureKind::Status(status.as_u16()),
                format!("{table} table returned {status}"),
            ));
        }
        let body = resp.text().await.map_err(Unavailable::from_reqwest)?;
        parse_records(&body, self.format)
            .map_err(|reason| Unavailable::new(FailureKind::Decode, reason))
    }

    async fn try_notes(&self, creds: &Credentials, wine: &str) -> Result<String, Unavailable> {
        let list_url = self.table_url(creds, "List", ("Wine", wine));
        let matches = self.query_table(&list_url, "List").await?;
        let wine_id = matches
            .iter()
            .find_map(|record| record.get(ID_COLUMN))
            .ok_or_else(|| Unavailable::new(FailureKind::NoMatch, format!("no wine matching {wine:?}")))?;

        let notes_url = self.table_url(creds, "Notes", (ID_COLUMN, wine_id));
        let records = self.query_table(&notes_url, "Notes").await?;
        let notes = select_notes(&records);
        if notes.is_empty() {
            return Err(Unavailable::new(FailureKind::NoMatch, format!("no notes for wine {wine_id}")));
        }
        info!(wine, wine_id, count = records.len(), "fetched community notes");
        Ok(notes)
    }
}

#[async_trait]
impl NotesSource for CellarTrackerClient {
    #[instrument(skip(self))]
    async fn notes(&self, wine: &str) -> Fetched<String> {
        let Some(creds) = self.credentials.as_ref() else {
            return Fetched::unavailable(
                FailureKind::NotConfigured,
                "CELLARTRACKER_USER/CELLARTRACKER_PASS are not set",
            );
        };
        let fetched: Fetched<String> = self.try_notes(creds, wine).await.into();
        if let Some(why) = fetched.failure() {
            warn!(wine, %why, "community notes unavailable");
        }
        fetched
    }
}

/// One provider row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Case-insensitive column lookup; empty values count as missing.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Parse a provider response body in the given format.
pub fn parse_records(body: &str, format: NotesFormat) -> Result<Vec<Record>, String> {
    match format {
        NotesFormat::Json => parse_json(body),
        NotesFormat::Tab => parse_tab(body),
    }
}

fn parse_json(body: &str) -> Result<Vec<Record>, String> {
    let value: Value = serde_json::from_str(body.trim()).map_err(|e| e.to_string())?;
    let rows = match value {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        other => return Err(format!("expected an array of records, got {other}")),
    };
    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            Value::Object(map) => Some(Record {
                fields: map
                    .into_iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (k, text)
                    })
                    .collect(),
            }),
            _ => None,
        })
        .collect())
}

fn parse_tab(body: &str) -> Result<Vec<Record>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(body.trim().as_bytes());
    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| e.to_string())?;
        records.push(Record {
            fields: headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.trim().to_string(), v.to_string()))
                .collect(),
        });
    }
    Ok(records)
}

/// Keep substantial notes, cap their number and join them.
pub fn select_notes(records: &[Record]) -> String {
    records
        .iter()
        .filter_map(|record| record.get(NOTE_COLUMN))
        .filter(|note| note.chars().count() > MIN_NOTE_CHARS)
        .take(MAX_NOTES)
        .collect::<Vec<_>>()
        .join("\n\n")
}
