//! Wine tasting-note aggregation, LLM scoring and radar charts.

pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod scoring;
