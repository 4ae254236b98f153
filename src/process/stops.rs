//! Bus stop dictionary: deduplicated stop metadata as a side output.

use crate::process::types::{CanonicalRow, StopInfo};
use std::collections::BTreeMap;

/// Builds the `stop_id -> metadata` dictionary from the filtered bus row
/// set. The first occurrence of each stop code wins.
pub fn build_stop_dictionary(rows: &[CanonicalRow]) -> BTreeMap<String, StopInfo> {
    let mut stops = BTreeMap::new();
    for row in rows {
        let Some(bus) = &row.bus else { continue };
        stops.entry(row.stop_id.clone()).or_insert_with(|| StopInfo {
            name: stop_name(&bus.stop_description),
            suburb: bus.suburb.clone(),
            latitude: bus.latitude,
            longitude: bus.longitude,
        });
    }
    stops
}

/// Extracts the human stop name from a description like
/// `"Circular Quay, Alfred St - Stand E, Sydney"`: first comma segment,
/// then the part after the dash.
fn stop_name(description: &str) -> Option<String> {
    let head = description.split(',').next().unwrap_or(description);
    head.split_once(" - ").map(|(_, name)| name.to_string())
}
