//! Static reference tables for line names and service denylists.
//!
//! The transit authority renames lines periodically, so the mapping lives
//! here as data rather than logic.

/// Verbose line/route labels mapped to their short display codes.
static LINES_MAP: &[(&str, &str)] = &[
    ("T7 Olympic Park Line", "T7"),
    ("T8 Airport & South Line", "T8"),
    ("T4 Eastern Suburbs & Illawarra Line", "T4"),
    ("Hunter Line", "HUN"),
    (
        "T2 Inner West & Leppington Line & T2 Leppington & Inner West Line",
        "T2",
    ),
    ("Metro North West & Bankstown Line", "M1"),
    ("Southern Highlands Line", "SHL"),
    ("Blue Mountains Line", "BMT"),
    ("T9 Northern Line", "T9"),
    ("South Coast Line", "SCO"),
    ("Central Coast & Newcastle Line", "CCN"),
    ("T1 North Shore Line", "T1 North Shore"),
    ("T5 Cumberland Line", "T5"),
    ("T1 Western Line", "T1 Western"),
    ("T6 Lidcombe & Bankstown Line", "T6"),
    (
        "T3 Bankstown Line & T3 Liverpool & Inner West Line",
        "T3",
    ),
    ("IWLR-191", "L1"),
    ("1001_L2", "L2"),
    ("1001_L3", "L3"),
    ("1001_LX", "LX"),
    ("ISD-17-6720_L4", "L4"),
    ("NT_NLR", "NLR"),
    ("Stkn Stockton Ferry", "Stockton Ferry"),
    ("MFF Manly Fast Ferry", "MFF"),
    ("F1 Manly", "F1"),
    ("F2 Taronga Zoo", "F2"),
    ("F3 Parramatta River", "F3"),
    ("F4 Pyrmont Bay", "F4"),
    ("F5 Neutral Bay", "F5"),
    ("F6 Mosman Bay", "F6"),
    ("F7 Double Bay", "F7"),
    ("F8 Cockatoo Island", "F8"),
    ("F9 Watsons Bay", "F9"),
    ("F10 Blackwattle Bay", "F10"),
];

/// Regional/long-distance reporting lines that are not part of the urban
/// fare system; their rows are excluded from rail batches.
pub static RAIL_DENYLIST: &[&str] = &[
    "Southern NSW",
    "North West NSW",
    "NSW TrainLink North Western Train Services",
    "NSW TrainLink Southern Train Services",
    "North Coast NSW",
    "Western NSW",
];

/// Route codes tagged as bus (type 700) in the GTFS reference but known to
/// be mis-tagged; excluded from the public-route set.
pub static BUS_ROUTE_DENYLIST: &[&str] = &["SW1", "SW2", "SW3"];

/// Maps a raw line label to its short code. Total: unmapped labels come
/// back unchanged.
pub fn map_line(raw: &str) -> &str {
    LINES_MAP
        .iter()
        .find(|(long, _)| *long == raw)
        .map(|(_, short)| *short)
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lines() {
        assert_eq!(map_line("T7 Olympic Park Line"), "T7");
        assert_eq!(map_line("Metro North West & Bankstown Line"), "M1");
        assert_eq!(map_line("F1 Manly"), "F1");
        assert_eq!(map_line("IWLR-191"), "L1");
    }

    #[test]
    fn test_identity_fallback() {
        assert_eq!(map_line("Some Future Line"), "Some Future Line");
        assert_eq!(map_line(""), "");
    }

    #[test]
    fn test_rail_denylist_contains_regional_services() {
        assert!(RAIL_DENYLIST.contains(&"Southern NSW"));
        assert!(!RAIL_DENYLIST.contains(&"Hunter Line"));
    }
}
