//! Dismissal-table ranking, narrative generation and report export.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod narrative;
pub mod report;
