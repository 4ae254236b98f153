//! Format-specific row exclusion rules.

use crate::process::lines::RAIL_DENYLIST;
use crate::process::schema::ResolvedSchema;
use crate::routes::PublicRoutes;
use csv::StringRecord;

/// The lowest published occupancy band. Unknown-depot rows in this band are
/// unreliable low-confidence readings and are dropped.
const LOWEST_BAND: &str = "0-20";

/// Raw-record filter applied before remapping.
///
/// - Rail: drop regional/long-distance reporting lines outside the urban
///   fare system.
/// - Bus: drop unknown-depot rows sitting in the lowest occupancy band.
/// - Light rail / ferry: restrict multi-day extracts to the requested
///   service date.
pub fn keep_raw(schema: &ResolvedSchema, record: &StringRecord, service_date: Option<&str>) -> bool {
    if let Some(line) = schema.reporting_line(record) {
        if RAIL_DENYLIST.contains(&line) {
            return false;
        }
    }

    if let Some(depot) = schema.depot(record) {
        if depot == "UNKNOWN" && schema.occupancy_range(record) == LOWEST_BAND {
            return false;
        }
    }

    if let (Some(row_date), Some(wanted)) = (schema.service_date(record), service_date) {
        if row_date != wanted {
            return false;
        }
    }

    true
}

/// Post-remap bus route restriction: only route codes present in the GTFS
/// reference as public bus routes survive; unknown codes are discarded.
pub fn keep_route(routes: Option<&PublicRoutes>, route: &str) -> bool {
    match routes {
        Some(routes) => routes.contains(route),
        None => true,
    }
}

/// Marker for the combined fare-card rows in the raw rail extract.
const ALL_CARD_TYPES: &str = "All card types";

/// Reduces a raw rail extract to the header plus all-card-type rows.
///
/// The upstream file repeats every stop event once per fare card type;
/// only the combined rows are wanted. A file without any card-type
/// segregation passes through unchanged.
pub fn prefilter_rail(raw: &str) -> String {
    if !raw.contains(ALL_CARD_TYPES) {
        return raw.to_string();
    }

    let mut lines = raw.lines();
    let mut out = String::new();
    if let Some(header) = lines.next() {
        out.push_str(header);
        out.push('\n');
    }
    for line in lines {
        if line.contains(ALL_CARD_TYPES) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
