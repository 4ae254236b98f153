//! Cosmetic trip-identifier rewriting, applied after assembly.
//!
//! Grouping already happened on the raw identifier; these rules only shape
//! the human-facing form. New rules slot into the table without touching
//! assembly.

use crate::process::types::Trip;

struct RewriteRule {
    applies: fn(line: &str, trip_id: &str) -> bool,
    rewrite: fn(trip_id: &str) -> String,
}

static RULES: &[RewriteRule] = &[
    // Metro internal ids end in ":1000"; the run number lives at a fixed
    // offset inside the composite key.
    RewriteRule {
        applies: |line, trip_id| line == "M1" && trip_id.ends_with(":1000"),
        rewrite: |trip_id| trip_id.get(9..16).unwrap_or(trip_id).to_string(),
    },
    // Ferry ids are "<route>-...-<run>.<suffix>"; recombine route and the
    // trailing dot component into the display form.
    RewriteRule {
        applies: |line, _| {
            let mut chars = line.chars();
            chars.next() == Some('F') && chars.next().is_some_and(|c| c.is_ascii_digit())
        },
        rewrite: |trip_id| {
            let mut segments = trip_id.split('-');
            let first = segments.next().unwrap_or(trip_id);
            let last = segments.last().unwrap_or(first);
            let run = last.rsplit('.').next().unwrap_or(last);
            format!("{first}-{run}")
        },
    },
];

/// Rewrites a trip identifier according to the first matching rule, if any.
pub fn rewrite_trip_id(line: &str, trip_id: &str) -> Option<String> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(line, trip_id))
        .map(|rule| (rule.rewrite)(trip_id))
}

/// Applies the rewrite rules to every assembled trip in place.
pub fn apply(trips: &mut [Trip]) {
    for trip in trips {
        if let Some(rewritten) = rewrite_trip_id(&trip.line, &trip.trip_id) {
            trip.trip_id = rewritten;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metro_run_number_truncation() {
        assert_eq!(
            rewrite_trip_id("M1", "20250822.NM01.123:1000").as_deref(),
            Some("NM01.12")
        );
    }

    #[test]
    fn test_metro_rule_requires_suffix() {
        assert_eq!(rewrite_trip_id("M1", "20250822.NM01.123:2000"), None);
    }

    #[test]
    fn test_ferry_run_splice() {
        assert_eq!(rewrite_trip_id("F1", "F1-123.45").as_deref(), Some("F1-45"));
        assert_eq!(
            rewrite_trip_id("F10", "F10-0930-CQ5.77").as_deref(),
            Some("F10-77")
        );
    }

    #[test]
    fn test_ferry_rule_requires_digit_after_f() {
        // named ferries like "MFF" or lines starting with F but no digit
        assert_eq!(rewrite_trip_id("MFF", "MFF-1.2"), None);
        assert_eq!(rewrite_trip_id("Freight", "X-1.2"), None);
    }

    #[test]
    fn test_other_lines_untouched() {
        assert_eq!(rewrite_trip_id("T7", "A1"), None);
        assert_eq!(rewrite_trip_id("L1", "2001_06:15"), None);
    }

    #[test]
    fn test_ferry_id_without_dash_or_dot() {
        // degenerate ids still produce something sensible
        assert_eq!(rewrite_trip_id("F2", "F2run").as_deref(), Some("F2run-F2run"));
    }
}
