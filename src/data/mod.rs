//! Review ingestion layer: page text, web search and community notes.

pub mod community;
pub mod extract;
pub mod fetch;
pub mod outcome;
pub mod search;

pub use outcome::{FailureKind, Fetched, Unavailable};
