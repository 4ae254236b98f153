//! GTFS `routes.txt` reference data for the bus pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::process::lines::BUS_ROUTE_DENYLIST;

/// GTFS route classification code for buses.
const ROUTE_TYPE_BUS: u32 = 700;

#[derive(Debug, Deserialize)]
struct RouteRecord {
    route_short_name: String,
    route_type: u32,
    #[serde(default)]
    route_long_name: String,
}

/// The set of public bus route codes, used to restrict bus rows to
/// GTFS-defined routes.
#[derive(Debug)]
pub struct PublicRoutes(HashSet<String>);

impl PublicRoutes {
    /// Loads route codes with `route_type == 700` from a GTFS `routes.txt`,
    /// excluding the known mis-tagged codes.
    pub fn load(path: &Path) -> Result<Self> {
        let mut routes = HashSet::new();
        for record in read_routes(path)? {
            if record.route_type == ROUTE_TYPE_BUS {
                routes.insert(record.route_short_name);
            }
        }
        for bad in BUS_ROUTE_DENYLIST {
            routes.remove(*bad);
        }
        Ok(PublicRoutes(routes))
    }

    pub fn contains(&self, route: &str) -> bool {
        self.0.contains(route)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the `route_short_name -> route_long_name` reference mapping for
/// all public bus routes.
pub fn route_names(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut names = BTreeMap::new();
    for record in read_routes(path)? {
        if record.route_type == ROUTE_TYPE_BUS {
            names.insert(record.route_short_name, record.route_long_name);
        }
    }
    Ok(names)
}

fn read_routes(path: &Path) -> Result<Vec<RouteRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening routes file {}", path.display()))?;
    rdr.deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("reading routes file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn routes_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const ROUTES_CSV: &str = "\
route_id,route_short_name,route_long_name,route_type
1,333,City to Bondi,700
2,891,Airport shuttle,700
3,SW1,School route,700
4,T7,Olympic Park,401
";

    #[test]
    fn test_public_routes_restricted_to_bus_type() {
        let file = routes_file(ROUTES_CSV);
        let routes = PublicRoutes::load(file.path()).unwrap();
        assert!(routes.contains("333"));
        assert!(routes.contains("891"));
        assert!(!routes.contains("T7"));
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_denylisted_codes_removed() {
        let file = routes_file(ROUTES_CSV);
        let routes = PublicRoutes::load(file.path()).unwrap();
        assert!(!routes.contains("SW1"));
    }

    #[test]
    fn test_route_names_keeps_denylisted_codes() {
        let file = routes_file(ROUTES_CSV);
        let names = route_names(file.path()).unwrap();
        assert_eq!(names.get("333").map(String::as_str), Some("City to Bondi"));
        assert_eq!(names.get("SW1").map(String::as_str), Some("School route"));
        assert!(!names.contains_key("T7"));
    }
}
