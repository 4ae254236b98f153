//! Batch orchestration: raw extract text in, assembled trips out.

use crate::error::SchemaError;
use crate::mode::Mode;
use crate::process::assemble::assemble;
use crate::process::filters::{keep_raw, keep_route, prefilter_rail};
use crate::process::occupancy::floor_band;
use crate::process::postprocess;
use crate::process::schema::{Derivation, derive_endpoints, schema_for};
use crate::process::stops::build_stop_dictionary;
use crate::process::types::{CanonicalRow, StopInfo, Trip};
use crate::routes::PublicRoutes;
use anyhow::Result;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Everything produced from one daily extract.
#[derive(Debug)]
pub struct ProcessedBatch {
    pub trips: Vec<Trip>,
    /// Bus only: the deduplicated stop dictionary side output.
    pub stops: Option<BTreeMap<String, StopInfo>>,
    pub summary: BatchSummary,
}

/// Row and trip counts reported at the end of each batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data rows parsed from the raw file.
    pub rows_read: usize,
    /// Rows excluded by format-specific filters and route restriction.
    pub rows_filtered: usize,
    /// Rows dropped for data-quality problems (bad band, bad sequence).
    pub rows_dropped: usize,
    pub trips: usize,
    pub stops: usize,
}

/// Runs the full normalization pipeline for one mode over one raw extract.
///
/// `service_date` (YYYY-MM-DD) restricts multi-day light rail and ferry
/// extracts; `routes` enables the bus public-route restriction (rows with
/// route codes outside the reference set are discarded).
///
/// A schema failure aborts the whole batch; no partial output is produced.
pub fn process_batch(
    mode: Mode,
    raw: &str,
    service_date: Option<&str>,
    routes: Option<&PublicRoutes>,
) -> Result<ProcessedBatch> {
    // The raw rail file repeats each stop event per fare card type.
    let raw: Cow<str> = if mode == Mode::Rail {
        Cow::Owned(prefilter_rail(raw))
    } else {
        Cow::Borrowed(raw)
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = rdr.headers()?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(SchemaError::EmptyFile { mode }.into());
    }
    let schema = schema_for(mode).resolve(&headers)?;

    let mut summary = BatchSummary::default();
    let mut rows: Vec<CanonicalRow> = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Unreadable record dropped");
                summary.rows_dropped += 1;
                continue;
            }
        };
        summary.rows_read += 1;

        if !keep_raw(&schema, &record, service_date) {
            summary.rows_filtered += 1;
            continue;
        }

        match schema.remap(&record) {
            Ok(Some(row)) => {
                if mode == Mode::Bus && !keep_route(routes, &row.line) {
                    summary.rows_filtered += 1;
                    continue;
                }
                rows.push(row);
            }
            Ok(None) => summary.rows_filtered += 1,
            Err(e) => {
                warn!(error = %e, "Row dropped");
                summary.rows_dropped += 1;
            }
        }
    }

    // Quantizer pass: bands become point estimates, malformed bands drop
    // the row.
    let mut quantized = Vec::with_capacity(rows.len());
    for mut row in rows {
        match floor_band(&row.occupancy_range) {
            Ok(floor) => {
                row.occupancy_floor = floor;
                quantized.push(row);
            }
            Err(e) => {
                warn!(trip_id = %row.trip_id, error = %e, "Row dropped");
                summary.rows_dropped += 1;
            }
        }
    }

    if schema
        .derivations
        .contains(&Derivation::EndpointsFromSequence)
    {
        derive_endpoints(&mut quantized);
    }

    let stops = (mode == Mode::Bus).then(|| build_stop_dictionary(&quantized));

    let mut trips = assemble(quantized);
    postprocess::apply(&mut trips);

    summary.trips = trips.len();
    summary.stops = stops.as_ref().map_or(0, BTreeMap::len);
    info!(
        mode = %mode,
        rows_read = summary.rows_read,
        rows_filtered = summary.rows_filtered,
        rows_dropped = summary.rows_dropped,
        trips = summary.trips,
        stops = summary.stops,
        "Batch complete"
    );

    Ok(ProcessedBatch {
        trips,
        stops,
        summary,
    })
}
