//! Ingestion and ranking of uploaded dismissal tables.

pub mod stats;

pub use stats::{rank, IngestError, RankedSet, StatRow, REQUIRED_COLUMNS, TOP_N};
