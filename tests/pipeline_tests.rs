use oam_processor::mode::Mode;
use oam_processor::process::pipeline::process_batch;
use oam_processor::routes::PublicRoutes;
use serde_json::json;
use std::io::Write;

const BUS_HEADER: &str = "ROUTE|ROUTE_VARIANT|TRIP_ID|DIRECTION|TRANSIT_STOP_SEQUENCE|SCHD_ARRIVE_TIME|ACTUAL_ARRIVE_TIME|TRANSIT_STOP|TRANSIT_STOP_DESCRIPTION|DEPOT|SUBURB|BUS_CONFIGURATION|TOTAL_CAPACITY|OCCUPANCY_RANGE|LATITUDE|LONGITUDE";

fn routes_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "route_id,route_short_name,route_long_name,route_type\n\
         1,333,City to Bondi,700\n\
         2,SW1,School route,700\n"
    )
    .unwrap();
    file
}

#[test]
fn test_bus_pipeline_end_to_end() {
    let raw = format!(
        "{BUS_HEADER}\n\
         333-2|333-2-E|trip9|North|1|07:58:00|08:00:00|200060|200060 - Circular Quay Stand E, Alfred St|PORT BOTANY|Sydney|Artic|115|21-40|-33.861|151.210\n\
         333-2|333-2-E|trip9|North|2|08:04:00|08:05:00|200071|200071 - Town Hall, Park St|PORT BOTANY|Sydney|Artic|115|61-80|-33.873|151.206\n\
         333-2|333-2-E|trip9|North|2|||200071|200071 - Town Hall, Park St|PORT BOTANY|Sydney|Artic|115|41-60|-33.873|151.206\n\
         333-2|333-2-E|trip9|North|3|08:10:00|08:11:00|200090|200090 - Museum, Elizabeth St|PORT BOTANY|Sydney|Artic|115|0-20|-33.877|151.209\n\
         X99-1||tripX|South|1|09:00:00|09:01:00|200060|200060 - Circular Quay Stand E, Alfred St|LEICHHARDT|Sydney|Rigid|70|21-40|-33.861|151.210\n\
         333-2|333-2-E|tripU|North|1|10:00:00|10:01:00|200060|200060 - Circular Quay Stand E, Alfred St|UNKNOWN|Sydney|Rigid|70|0-20|-33.861|151.210\n\
         333-2|333-2-E|tripV|North|1|10:00:00|10:01:00|200060|200060 - Circular Quay Stand E, Alfred St|UNKNOWN|Sydney|Rigid|70|21-40|-33.861|151.210\n"
    );

    let routes_file = routes_fixture();
    let routes = PublicRoutes::load(routes_file.path()).unwrap();
    let batch = process_batch(Mode::Bus, &raw, None, Some(&routes)).unwrap();

    // tripX is on an unknown route, tripU has unknown depot in the lowest
    // band; both excluded. tripV (unknown depot, higher band) survives.
    assert_eq!(batch.summary.rows_read, 7);
    assert_eq!(batch.summary.rows_filtered, 2);
    assert_eq!(batch.summary.rows_dropped, 0);
    assert_eq!(batch.summary.trips, 2);

    let trip = batch.trips.iter().find(|t| t.trip_id == "trip9").unwrap();
    assert_eq!(trip.line, "333");
    assert_eq!(trip.seat_capacity, 115);
    assert_eq!(trip.depot.as_deref(), Some("PORT BOTANY"));
    assert_eq!(trip.bus_type.as_deref(), Some("Artic"));
    assert_eq!(trip.peak_load, Some(60));
    assert_eq!(trip.departure_time.as_deref(), Some("08:00:00"));

    // duplicate arrival/departure pair for seq 2 deduplicated, timed row kept
    let seqs: Vec<u32> = trip.stops.iter().map(|s| s.seq_order).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(trip.stops[1].occupancy_floor, 60);

    // stop dictionary side output
    let stops = batch.stops.as_ref().unwrap();
    assert_eq!(stops.len(), 3);
    assert_eq!(
        stops["200060"].name.as_deref(),
        Some("Circular Quay Stand E")
    );

    // serialized shape: bus trips carry DEPOT/BUS_TYPE/PEAK_LOAD, no endpoints
    let value = serde_json::to_value(trip).unwrap();
    assert_eq!(value["DEPOT"], json!("PORT BOTANY"));
    assert_eq!(value["PEAK_LOAD"], json!(60));
    assert!(value.get("ORIG_STN").is_none());
    assert_eq!(value["STOPS"][0][0], json!(1));
    assert_eq!(value["STOPS"][0][1], json!("200060"));
}

#[test]
fn test_rail_scenario_two_stop_trip() {
    let raw = "\
ACT_STOP_STN|ACT_STN_ARRV_TIME|ACT_STN_DPRT_TIME|PLN_STN_DPRT_TIME|SEGMENT_DIRECTION|TRIP_NAME|TRIP_ZONE|ORIG_STN|DEST_STN|NODE_SEQ_ORDER|SEAT_CAPACITY|OCCUPANCY_RANGE|REPORTING_LINE
Central|07:59:00|08:00:00||Up|A1|T7 Olympic Park Line|Central|Olympic Park|1|504|0-20|T7 Olympic Park Line
Olympic Park|08:09:00|08:10:00||Up|A1|T7 Olympic Park Line|Central|Olympic Park|2|504|21-40|T7 Olympic Park Line
";
    let batch = process_batch(Mode::Rail, raw, None, None).unwrap();
    assert_eq!(batch.trips.len(), 1);

    let value = serde_json::to_value(&batch.trips[0]).unwrap();
    assert_eq!(value["TRIP_NAME"], json!("A1"));
    assert_eq!(value["LINE"], json!("T7"));
    assert_eq!(value["TIME"], json!("08:00:00"));
    assert_eq!(
        value["STOPS"],
        json!([
            [1, "Central", "08:00:00", 0],
            [2, "Olympic Park", "08:10:00", 20]
        ])
    );
}

#[test]
fn test_light_rail_pipeline_end_to_end() {
    let raw = "\
SERVICE_DATE|STOP_ID_START_TIME|ROUTE_ID|ORIG_STN|STOP_SEQ|ACT_STN_DPRT_TIME|OCCUPANCY_RANGE|SEAT_CAPACITY|DIRECTION
2025-08-22|2001_06:15|IWLR-191|Central Chalmers Street Light Rail|1|06:15:00|0-20|220|Inbound
2025-08-22|2001_06:15|IWLR-191|Capitol Square Light Rail|2|06:19:00|21-40|220|Inbound
2025-08-22|2001_06:15|IWLR-191|Dulwich Hill Light Rail|3|06:55:00|0-20|220|Inbound
2025-08-23|2001_06:15|IWLR-191|Central Chalmers Street Light Rail|1|06:15:00|0-20|220|Inbound
";
    let batch = process_batch(Mode::LightRail, raw, Some("2025-08-22"), None).unwrap();

    assert_eq!(batch.summary.rows_filtered, 1, "other service date excluded");
    assert_eq!(batch.trips.len(), 1);

    let trip = &batch.trips[0];
    assert_eq!(trip.line, "L1");
    assert_eq!(trip.origin_stn.as_deref(), Some("Central Chalmers Street"));
    assert_eq!(trip.dest_stn.as_deref(), Some("Dulwich Hill"));
    assert_eq!(trip.stops[1].stop_id, "Capitol Square");
}

#[test]
fn test_metro_trip_id_rewrite() {
    let raw = "\
ACT_STOP_STN|ACT_STN_ARRV_TIME|ACT_STN_DPRT_TIME|PLN_STN_DPRT_TIME|SEGMENT_DIRECTION|TRIP_NAME|TRIP_ZONE|ORIG_STN|DEST_STN|NODE_SEQ_ORDER|SEAT_CAPACITY|OCCUPANCY_RANGE|REPORTING_LINE
Chatswood|08:00:00|08:01:00||Down|20250822.123-456:1000|Metro North West & Bankstown Line|Tallawong|Sydenham|1|378|41-60|Metro North West & Bankstown Line
";
    let batch = process_batch(Mode::Rail, raw, None, None).unwrap();
    let trip = &batch.trips[0];
    assert_eq!(trip.line, "M1");
    // positions 9..16 of the raw identifier
    assert_eq!(trip.trip_id, "123-456");
}

#[test]
fn test_no_output_for_schema_error() {
    let raw = "WRONG|COLUMNS\na|b\n";
    assert!(process_batch(Mode::LightRail, raw, None, None).is_err());
}
