//! Transit modes and their daily extract file tags.

use clap::ValueEnum;
use std::fmt;

/// A transit mode, one per upstream extract format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mode {
    /// Bus occupancy extract (BOAM)
    Bus,
    /// Rail occupancy extract (ROAM), heavy rail and metro
    Rail,
    /// Light rail occupancy extract (LOAM)
    LightRail,
    /// Ferry occupancy extract (FOAM)
    Ferry,
}

impl Mode {
    /// Upstream file tag, as used in published file names and URLs.
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Bus => "BOAM",
            Mode::Rail => "ROAM",
            Mode::LightRail => "LOAM",
            Mode::Ferry => "FOAM",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
