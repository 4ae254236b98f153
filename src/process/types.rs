//! Canonical row and trip types shared across the pipeline.

use serde::Serialize;
use serde::ser::{SerializeTuple, Serializer};

/// One stop event after remapping onto the canonical column set.
///
/// All four source formats reduce to this shape; fields the source does not
/// carry are `None` (bus has no trip endpoints, light rail and ferry derive
/// theirs from the stop sequence).
#[derive(Debug, Clone)]
pub struct CanonicalRow {
    pub trip_id: String,
    /// Raw long-form line name; mapped to a short code at assembly.
    pub line: String,
    pub stop_id: String,
    pub seq_order: u32,
    /// Actual departure, falling back to actual arrival, then planned
    /// departure. Timestamps are ISO-like strings and compare correctly
    /// as strings.
    pub departure_time: Option<String>,
    /// Banded range as published, e.g. `"21-40"`.
    pub occupancy_range: String,
    /// Point estimate for the band, set by the quantizer pass.
    pub occupancy_floor: u32,
    pub seat_capacity: i64,
    pub direction: String,
    pub origin_stn: Option<String>,
    pub dest_stn: Option<String>,
    pub bus: Option<BusExtras>,
}

/// Bus-format columns with no counterpart in the other modes.
#[derive(Debug, Clone)]
pub struct BusExtras {
    pub depot: String,
    pub bus_type: String,
    pub stop_description: String,
    pub suburb: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One assembled trip, the canonical output unit.
///
/// Serialized field names match the upstream extracts so existing consumers
/// keep working; bus-only fields are omitted entirely for the other modes
/// and consumers key on field presence.
#[derive(Debug, Serialize)]
pub struct Trip {
    #[serde(rename = "TRIP_NAME")]
    pub trip_id: String,
    #[serde(rename = "LINE")]
    pub line: String,
    #[serde(rename = "ORIG_STN", skip_serializing_if = "Option::is_none")]
    pub origin_stn: Option<String>,
    #[serde(rename = "DEST_STN", skip_serializing_if = "Option::is_none")]
    pub dest_stn: Option<String>,
    #[serde(rename = "TIME")]
    pub departure_time: Option<String>,
    #[serde(rename = "SEAT_CAPACITY")]
    pub seat_capacity: i64,
    #[serde(rename = "SEGMENT_DIRECTION")]
    pub direction: String,
    #[serde(rename = "DEPOT", skip_serializing_if = "Option::is_none")]
    pub depot: Option<String>,
    #[serde(rename = "BUS_TYPE", skip_serializing_if = "Option::is_none")]
    pub bus_type: Option<String>,
    #[serde(rename = "PEAK_LOAD", skip_serializing_if = "Option::is_none")]
    pub peak_load: Option<u32>,
    #[serde(rename = "STOPS")]
    pub stops: Vec<StopEvent>,
}

/// One entry in a trip's ordered stop list.
///
/// Serialized as the 4-tuple `[seq_order, stop_id, departure_time,
/// occupancy_floor]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StopEvent {
    pub seq_order: u32,
    pub stop_id: String,
    pub departure_time: Option<String>,
    pub occupancy_floor: u32,
}

impl Serialize for StopEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(4)?;
        tup.serialize_element(&self.seq_order)?;
        tup.serialize_element(&self.stop_id)?;
        tup.serialize_element(&self.departure_time)?;
        tup.serialize_element(&self.occupancy_floor)?;
        tup.end()
    }
}

/// Bus stop metadata, keyed by stop code in the stop dictionary output.
///
/// Serialized as `[name, suburb, [latitude, longitude]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub name: Option<String>,
    pub suburb: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Serialize for StopInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(3)?;
        tup.serialize_element(&self.name)?;
        tup.serialize_element(&self.suburb)?;
        tup.serialize_element(&(self.latitude, self.longitude))?;
        tup.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_event_serializes_as_array() {
        let stop = StopEvent {
            seq_order: 1,
            stop_id: "Central".to_string(),
            departure_time: Some("08:00:00".to_string()),
            occupancy_floor: 0,
        };
        let json = serde_json::to_string(&stop).unwrap();
        assert_eq!(json, r#"[1,"Central","08:00:00",0]"#);
    }

    #[test]
    fn test_trip_omits_bus_fields_when_absent() {
        let trip = Trip {
            trip_id: "A1".to_string(),
            line: "T7".to_string(),
            origin_stn: Some("Central".to_string()),
            dest_stn: Some("Olympic Park".to_string()),
            departure_time: Some("08:00:00".to_string()),
            seat_capacity: 504,
            direction: "Up".to_string(),
            depot: None,
            bus_type: None,
            peak_load: None,
            stops: vec![],
        };
        let json = serde_json::to_string(&trip).unwrap();
        assert!(json.contains(r#""TRIP_NAME":"A1""#));
        assert!(!json.contains("DEPOT"));
        assert!(!json.contains("PEAK_LOAD"));
    }

    #[test]
    fn test_stop_info_serializes_as_nested_tuple() {
        let info = StopInfo {
            name: Some("Elizabeth St".to_string()),
            suburb: "Sydney".to_string(),
            latitude: Some(-33.87),
            longitude: Some(151.21),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"["Elizabeth St","Sydney",[-33.87,151.21]]"#);
    }
}
