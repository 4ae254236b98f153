//! Error taxonomy for the processing pipeline.
//!
//! Schema errors are fatal for the whole batch (no partial output), row
//! errors drop a single row and are counted, fetch errors skip a date.

use crate::mode::Mode;

/// Fatal batch-level errors: the input file cannot be mapped onto the
/// canonical schema at all.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("{mode} file is missing required columns: {}", missing.join(", "))]
    MissingColumns { mode: Mode, missing: Vec<String> },

    #[error("{mode} file has no header row")]
    EmptyFile { mode: Mode },
}

/// Per-row data-quality errors. The offending row is dropped and counted;
/// the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("malformed occupancy band {band:?}")]
    BadOccupancyBand { band: String },

    #[error("non-numeric stop sequence {value:?}")]
    BadSeqOrder { value: String },
}

/// Download failures for a single date. Not-found is distinguished so a
/// date-range run can skip gaps quietly.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("extract not published: {url} (status {status})")]
    NotFound { url: String, status: u16 },

    #[error("invalid extract URL {url}")]
    InvalidUrl { url: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
