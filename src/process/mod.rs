//! Schema normalization and trip assembly for the daily occupancy extracts.
//!
//! Each mode's pipe-delimited file is filtered, remapped onto one canonical
//! row shape, quantized, grouped into trips, and serialized as JSON.

pub mod assemble;
pub mod filters;
pub mod lines;
pub mod occupancy;
pub mod pipeline;
pub mod postprocess;
pub mod schema;
pub mod stops;
pub mod types;
