//! Per-mode source schemas and remapping onto the canonical row shape.
//!
//! Each extract format declares a [`ColumnMap`] (canonical field -> source
//! column name) plus an ordered list of [`Derivation`] rules. Adding a fifth
//! mode means adding one [`ModeSchema`] value, not branching logic.

use crate::error::{RowError, SchemaError};
use crate::mode::Mode;
use crate::process::types::{BusExtras, CanonicalRow};
use csv::StringRecord;

/// Canonical field to source column mapping for one extract format.
///
/// `None` means the format does not carry that field at all; a declared
/// column that is absent from the file header fails the batch.
pub struct ColumnMap {
    pub trip_id: &'static str,
    pub line: &'static str,
    pub stop_id: &'static str,
    pub seq_order: &'static str,
    /// Actual departure time.
    pub departure_time: Option<&'static str>,
    /// Actual arrival time, first fallback when departure is empty.
    pub arrival_time: Option<&'static str>,
    /// Planned departure time, second fallback.
    pub planned_time: Option<&'static str>,
    pub occupancy_range: &'static str,
    pub seat_capacity: &'static str,
    pub direction: &'static str,
    pub origin_stn: Option<&'static str>,
    pub dest_stn: Option<&'static str>,
    /// Line used by the rail regional-service filter.
    pub reporting_line: Option<&'static str>,
    /// Service-date column for extracts spanning several days.
    pub service_date: Option<&'static str>,
    pub bus: Option<BusColumns>,
}

/// Source columns only the bus format carries.
pub struct BusColumns {
    pub route_variant: &'static str,
    pub depot: &'static str,
    pub bus_configuration: &'static str,
    pub stop_description: &'static str,
    pub suburb: &'static str,
    pub latitude: &'static str,
    pub longitude: &'static str,
}

/// Mode-specific column transformations, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    /// Route code falls back to the variant column when empty, then keeps
    /// the substring before the first `-`. Rows empty in both are dropped.
    RouteFromVariant,
    /// Remove a fixed suffix from every stop name.
    StripStopSuffix(&'static str),
    /// Keep everything before the first occurrence of the marker in the
    /// stop name.
    TruncateStopAt(&'static str),
    /// Fill `origin_stn`/`dest_stn` from the first and last stop of each
    /// trip group, ordered by stop sequence.
    EndpointsFromSequence,
}

/// Complete declared schema for one extract format.
pub struct ModeSchema {
    pub mode: Mode,
    pub columns: ColumnMap,
    pub derivations: &'static [Derivation],
}

pub static BUS_SCHEMA: ModeSchema = ModeSchema {
    mode: Mode::Bus,
    columns: ColumnMap {
        trip_id: "TRIP_ID",
        line: "ROUTE",
        stop_id: "TRANSIT_STOP",
        seq_order: "TRANSIT_STOP_SEQUENCE",
        departure_time: None,
        arrival_time: Some("ACTUAL_ARRIVE_TIME"),
        planned_time: Some("SCHD_ARRIVE_TIME"),
        occupancy_range: "OCCUPANCY_RANGE",
        seat_capacity: "TOTAL_CAPACITY",
        direction: "DIRECTION",
        origin_stn: None,
        dest_stn: None,
        reporting_line: None,
        service_date: None,
        bus: Some(BusColumns {
            route_variant: "ROUTE_VARIANT",
            depot: "DEPOT",
            bus_configuration: "BUS_CONFIGURATION",
            stop_description: "TRANSIT_STOP_DESCRIPTION",
            suburb: "SUBURB",
            latitude: "LATITUDE",
            longitude: "LONGITUDE",
        }),
    },
    derivations: &[Derivation::RouteFromVariant],
};

pub static RAIL_SCHEMA: ModeSchema = ModeSchema {
    mode: Mode::Rail,
    columns: ColumnMap {
        trip_id: "TRIP_NAME",
        line: "TRIP_ZONE",
        stop_id: "ACT_STOP_STN",
        seq_order: "NODE_SEQ_ORDER",
        departure_time: Some("ACT_STN_DPRT_TIME"),
        arrival_time: Some("ACT_STN_ARRV_TIME"),
        planned_time: Some("PLN_STN_DPRT_TIME"),
        occupancy_range: "OCCUPANCY_RANGE",
        seat_capacity: "SEAT_CAPACITY",
        direction: "SEGMENT_DIRECTION",
        origin_stn: Some("ORIG_STN"),
        dest_stn: Some("DEST_STN"),
        reporting_line: Some("REPORTING_LINE"),
        service_date: None,
        bus: None,
    },
    derivations: &[],
};

// The light rail extract reuses "ORIG_STN" for the stop name; the real trip
// endpoints only exist implicitly in the stop sequence.
pub static LIGHT_RAIL_SCHEMA: ModeSchema = ModeSchema {
    mode: Mode::LightRail,
    columns: ColumnMap {
        trip_id: "STOP_ID_START_TIME",
        line: "ROUTE_ID",
        stop_id: "ORIG_STN",
        seq_order: "STOP_SEQ",
        departure_time: Some("ACT_STN_DPRT_TIME"),
        arrival_time: None,
        planned_time: None,
        occupancy_range: "OCCUPANCY_RANGE",
        seat_capacity: "SEAT_CAPACITY",
        direction: "DIRECTION",
        origin_stn: None,
        dest_stn: None,
        reporting_line: None,
        service_date: Some("SERVICE_DATE"),
        bus: None,
    },
    derivations: &[
        Derivation::StripStopSuffix(" Light Rail"),
        Derivation::EndpointsFromSequence,
    ],
};

pub static FERRY_SCHEMA: ModeSchema = ModeSchema {
    mode: Mode::Ferry,
    columns: ColumnMap {
        trip_id: "RUN_NUMBER",
        line: "ROUTE_DESC",
        stop_id: "LOCATION",
        seq_order: "STOP_SEQ",
        departure_time: Some("DEPRT_ACTUAL"),
        arrival_time: None,
        planned_time: None,
        occupancy_range: "OCCUPANCY_RANGE",
        seat_capacity: "CAPACITY",
        direction: "DIRECTION",
        origin_stn: None,
        dest_stn: None,
        reporting_line: None,
        service_date: Some("RUN_DATE"),
        bus: None,
    },
    // "... Wharf" truncation also catches "Circular Quay Wharf 1" style names.
    derivations: &[
        Derivation::TruncateStopAt(" Wharf"),
        Derivation::EndpointsFromSequence,
    ],
};

pub fn schema_for(mode: Mode) -> &'static ModeSchema {
    match mode {
        Mode::Bus => &BUS_SCHEMA,
        Mode::Rail => &RAIL_SCHEMA,
        Mode::LightRail => &LIGHT_RAIL_SCHEMA,
        Mode::Ferry => &FERRY_SCHEMA,
    }
}

/// A [`ModeSchema`] bound to the header row of an actual file, with every
/// declared column resolved to a field index.
#[derive(Debug)]
pub struct ResolvedSchema {
    pub mode: Mode,
    pub derivations: &'static [Derivation],
    trip_id: usize,
    line: usize,
    stop_id: usize,
    seq_order: usize,
    departure_time: Option<usize>,
    arrival_time: Option<usize>,
    planned_time: Option<usize>,
    occupancy_range: usize,
    seat_capacity: usize,
    direction: usize,
    origin_stn: Option<usize>,
    dest_stn: Option<usize>,
    reporting_line: Option<usize>,
    service_date: Option<usize>,
    bus: Option<ResolvedBusColumns>,
}

#[derive(Debug)]
struct ResolvedBusColumns {
    route_variant: usize,
    depot: usize,
    bus_configuration: usize,
    stop_description: usize,
    suburb: usize,
    latitude: usize,
    longitude: usize,
}

/// Looks up a declared column in the header, recording it as missing
/// instead of failing so every absent column is diagnosed in one pass.
fn position(headers: &StringRecord, name: &'static str, missing: &mut Vec<String>) -> usize {
    match headers.iter().position(|h| h.trim() == name) {
        Some(i) => i,
        None => {
            missing.push(name.to_string());
            usize::MAX
        }
    }
}

fn position_opt(
    headers: &StringRecord,
    name: Option<&'static str>,
    missing: &mut Vec<String>,
) -> Option<usize> {
    name.map(|n| position(headers, n, missing))
}

impl ModeSchema {
    /// Binds the schema to a header row.
    ///
    /// Every column the schema declares must be present; the error lists
    /// all absent columns at once.
    pub fn resolve(&'static self, headers: &StringRecord) -> Result<ResolvedSchema, SchemaError> {
        let mut missing = Vec::new();
        let m = &mut missing;

        let c = &self.columns;
        let trip_id = position(headers, c.trip_id, m);
        let line = position(headers, c.line, m);
        let stop_id = position(headers, c.stop_id, m);
        let seq_order = position(headers, c.seq_order, m);
        let occupancy_range = position(headers, c.occupancy_range, m);
        let seat_capacity = position(headers, c.seat_capacity, m);
        let direction = position(headers, c.direction, m);

        let departure_time = position_opt(headers, c.departure_time, m);
        let arrival_time = position_opt(headers, c.arrival_time, m);
        let planned_time = position_opt(headers, c.planned_time, m);
        let origin_stn = position_opt(headers, c.origin_stn, m);
        let dest_stn = position_opt(headers, c.dest_stn, m);
        let reporting_line = position_opt(headers, c.reporting_line, m);
        let service_date = position_opt(headers, c.service_date, m);

        let bus = c.bus.as_ref().map(|b| ResolvedBusColumns {
            route_variant: position(headers, b.route_variant, m),
            depot: position(headers, b.depot, m),
            bus_configuration: position(headers, b.bus_configuration, m),
            stop_description: position(headers, b.stop_description, m),
            suburb: position(headers, b.suburb, m),
            latitude: position(headers, b.latitude, m),
            longitude: position(headers, b.longitude, m),
        });

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                mode: self.mode,
                missing,
            });
        }

        Ok(ResolvedSchema {
            mode: self.mode,
            derivations: self.derivations,
            trip_id,
            line,
            stop_id,
            seq_order,
            departure_time,
            arrival_time,
            planned_time,
            occupancy_range,
            seat_capacity,
            direction,
            origin_stn,
            dest_stn,
            reporting_line,
            service_date,
            bus,
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Missing or unparseable capacities become 0 rather than failing the row.
fn parse_capacity(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }
    value
        .parse::<i64>()
        .or_else(|_| value.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

impl ResolvedSchema {
    /// Reporting line of a raw record, for the rail regional filter.
    pub fn reporting_line<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        self.reporting_line.map(|i| field(record, i))
    }

    /// Service date of a raw record, for multi-day extracts.
    pub fn service_date<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        self.service_date.map(|i| field(record, i))
    }

    /// Depot of a raw bus record.
    pub fn depot<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        self.bus.as_ref().map(|b| field(record, b.depot))
    }

    /// Raw occupancy band, available pre-remap for the bus depot filter.
    pub fn occupancy_range<'r>(&self, record: &'r StringRecord) -> &'r str {
        field(record, self.occupancy_range)
    }

    /// Remaps one raw record onto the canonical row shape.
    ///
    /// Returns `Ok(None)` when a derivation excludes the row (bus rows with
    /// no route code in either column). Sequence parse failures are
    /// [`RowError`]s; the caller drops and counts them.
    pub fn remap(&self, record: &StringRecord) -> Result<Option<CanonicalRow>, RowError> {
        let line = match self.derived_line(record) {
            Some(line) => line,
            None => return Ok(None),
        };

        let seq_raw = field(record, self.seq_order);
        let seq_order: u32 = seq_raw.parse().map_err(|_| RowError::BadSeqOrder {
            value: seq_raw.to_string(),
        })?;

        let mut stop_id = field(record, self.stop_id).to_string();
        for derivation in self.derivations {
            match derivation {
                Derivation::StripStopSuffix(suffix) => {
                    stop_id = stop_id.replace(suffix, "");
                }
                Derivation::TruncateStopAt(marker) => {
                    if let Some(pos) = stop_id.find(marker) {
                        stop_id.truncate(pos);
                    }
                }
                _ => {}
            }
        }

        let departure_time = self
            .departure_time
            .and_then(|i| non_empty(field(record, i)))
            .or_else(|| self.arrival_time.and_then(|i| non_empty(field(record, i))))
            .or_else(|| self.planned_time.and_then(|i| non_empty(field(record, i))));

        let bus = self.bus.as_ref().map(|b| {
            let bus_type = field(record, b.bus_configuration);
            BusExtras {
                depot: field(record, b.depot).to_string(),
                bus_type: if bus_type.is_empty() {
                    "Unknown".to_string()
                } else {
                    bus_type.to_string()
                },
                stop_description: field(record, b.stop_description).to_string(),
                suburb: field(record, b.suburb).to_string(),
                latitude: field(record, b.latitude).parse().ok(),
                longitude: field(record, b.longitude).parse().ok(),
            }
        });

        Ok(Some(CanonicalRow {
            trip_id: field(record, self.trip_id).to_string(),
            line,
            stop_id,
            seq_order,
            departure_time,
            occupancy_range: self.occupancy_range(record).to_string(),
            occupancy_floor: 0,
            seat_capacity: parse_capacity(field(record, self.seat_capacity)),
            direction: field(record, self.direction).to_string(),
            origin_stn: self.origin_stn.and_then(|i| non_empty(field(record, i))),
            dest_stn: self.dest_stn.and_then(|i| non_empty(field(record, i))),
            bus,
        }))
    }

    fn derived_line(&self, record: &StringRecord) -> Option<String> {
        let raw = field(record, self.line);
        if !self
            .derivations
            .contains(&Derivation::RouteFromVariant)
        {
            return Some(raw.to_string());
        }

        let variant = self
            .bus
            .as_ref()
            .map(|b| field(record, b.route_variant))
            .unwrap_or("");
        let route = if raw.is_empty() { variant } else { raw };
        if route.is_empty() {
            return None;
        }
        Some(route.split('-').next().unwrap_or(route).to_string())
    }
}

/// Fills `origin_stn`/`dest_stn` from the first and last stop of each trip
/// group, ordered by stop sequence (ties keep file order).
pub fn derive_endpoints(rows: &mut [CanonicalRow]) {
    use std::collections::HashMap;

    struct Endpoints {
        first_seq: u32,
        first_stop: String,
        last_seq: u32,
        last_stop: String,
    }

    let mut by_trip: HashMap<String, Endpoints> = HashMap::new();
    for row in rows.iter() {
        by_trip
            .entry(row.trip_id.clone())
            .and_modify(|e| {
                if row.seq_order < e.first_seq {
                    e.first_seq = row.seq_order;
                    e.first_stop = row.stop_id.clone();
                }
                if row.seq_order >= e.last_seq {
                    e.last_seq = row.seq_order;
                    e.last_stop = row.stop_id.clone();
                }
            })
            .or_insert_with(|| Endpoints {
                first_seq: row.seq_order,
                first_stop: row.stop_id.clone(),
                last_seq: row.seq_order,
                last_stop: row.stop_id.clone(),
            });
    }

    for row in rows.iter_mut() {
        if let Some(e) = by_trip.get(&row.trip_id) {
            row.origin_stn = Some(e.first_stop.clone());
            row.dest_stn = Some(e.last_stop.clone());
        }
    }
}
