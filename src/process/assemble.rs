//! Trip assembly: canonical rows grouped and ordered into trips.

use crate::process::lines::map_line;
use crate::process::types::{CanonicalRow, StopEvent, Trip};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Groups canonical rows by trip identifier and builds one [`Trip`] per
/// group.
///
/// Within each group rows are stably sorted by `(seq_order, departure_time)`
/// with missing times last, then deduplicated on `seq_order` keeping the
/// first row (arrival/departure event pairs share a sequence number).
/// Trip-level scalars come from the first sorted row; they are not checked
/// for consistency across the group. The trip departure time is the minimum
/// timestamp anywhere in the group, which tolerates out-of-order clocks.
///
/// Output trips are ordered by raw trip identifier. A single-stop trip is
/// valid.
pub fn assemble(rows: Vec<CanonicalRow>) -> Vec<Trip> {
    let mut groups: BTreeMap<String, Vec<CanonicalRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.trip_id.clone()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(trip_id, mut group)| {
            group.sort_by(|a, b| {
                a.seq_order
                    .cmp(&b.seq_order)
                    .then_with(|| cmp_times_nulls_last(&a.departure_time, &b.departure_time))
            });
            group.dedup_by(|a, b| a.seq_order == b.seq_order);

            let departure_time = group
                .iter()
                .filter_map(|r| r.departure_time.as_ref())
                .min()
                .cloned();

            let first = &group[0];
            let line = map_line(&first.line).to_string();
            let (depot, bus_type) = match &first.bus {
                Some(bus) => (Some(bus.depot.clone()), Some(bus.bus_type.clone())),
                None => (None, None),
            };
            let peak_load = first
                .bus
                .as_ref()
                .map(|_| group.iter().map(|r| r.occupancy_floor).max().unwrap_or(0));

            Trip {
                trip_id,
                line,
                origin_stn: first.origin_stn.clone(),
                dest_stn: first.dest_stn.clone(),
                departure_time,
                seat_capacity: first.seat_capacity,
                direction: first.direction.clone(),
                depot,
                bus_type,
                peak_load,
                stops: group
                    .iter()
                    .map(|r| StopEvent {
                        seq_order: r.seq_order,
                        stop_id: r.stop_id.clone(),
                        departure_time: r.departure_time.clone(),
                        occupancy_floor: r.occupancy_floor,
                    })
                    .collect(),
            }
        })
        .collect()
}

fn cmp_times_nulls_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
