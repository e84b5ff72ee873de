//! Explicit success-or-reason result for calls to external sources.

use std::fmt;

/// Why an external source produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The request did not finish within the configured timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// The server answered with a non-success status.
    Status(u16),
    /// The body was too short to be a real page.
    TooShort,
    /// The body could not be read or decoded.
    Decode,
    /// Credentials for the source are missing.
    NotConfigured,
    /// The source answered but had nothing for this wine.
    NoMatch,
}

impl FailureKind {
    /// Whether trying the same request again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FailureKind::Timeout | FailureKind::Connect => true,
            FailureKind::Status(code) => *code == 429 || *code >= 500,
            FailureKind::TooShort
            | FailureKind::Decode
            | FailureKind::NotConfigured
            | FailureKind::NoMatch => false,
        }
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_connect() {
            FailureKind::Connect
        } else if let Some(status) = err.status() {
            FailureKind::Status(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            FailureKind::Decode
        } else {
            FailureKind::Connect
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Connect => f.write_str("connection failed"),
            FailureKind::Status(code) => write!(f, "http status {code}"),
            FailureKind::TooShort => f.write_str("body too short"),
            FailureKind::Decode => f.write_str("undecodable body"),
            FailureKind::NotConfigured => f.write_str("not configured"),
            FailureKind::NoMatch => f.write_str("no match"),
        }
    }
}

/// Failure with its classification and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub kind: FailureKind,
    pub reason: String,
}

impl Unavailable {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        Self::new(FailureKind::from_reqwest(&err), err.to_string())
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

/// Outcome of one external fetch: content, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Content(T),
    Unavailable(Unavailable),
}

impl<T> Fetched<T> {
    pub fn unavailable(kind: FailureKind, reason: impl Into<String>) -> Self {
        Fetched::Unavailable(Unavailable::new(kind, reason))
    }

    pub fn content(self) -> Option<T> {
        match self {
            Fetched::Content(value) => Some(value),
            Fetched::Unavailable(_) => None,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Fetched::Content(_))
    }

    pub fn failure(&self) -> Option<&Unavailable> {
        match self {
            Fetched::Content(_) => None,
            Fetched::Unavailable(why) => Some(why),
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Collapse to the content, or an empty value for any failure.
    pub fn unwrap_or_empty(self) -> T {
        self.content().unwrap_or_default()
    }
}

impl<T> From<Result<T, Unavailable>> for Fetched<T> {
    fn from(value: Result<T, Unavailable>) -> Self {
        match value {
            Ok(content) => Fetched::Content(content),
            Err(why) => Fetched::Unavailable(why),
        }
    }
}
