//! Yangon shelters and incident locations for realistic test fixtures.
//!
//! Coordinates are approximate township centres taken from OpenStreetMap;
//! they are routable with the OSRM Myanmar extract.

use rescue_router::model::{Depot, Point, Report};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lng)
    }
}

// ============================================================================
// Shelters (one per default region group, in group order)
// ============================================================================

pub const SHELTERS: &[Location] = &[
    Location::new("Tarmwe Animal Shelter", 16.8050, 96.1800),
    Location::new("North Dagon Rescue", 16.8700, 96.1950),
    Location::new("Hlaing Rescue Center", 16.8530, 96.1180),
    Location::new("Downtown Shelter", 16.7760, 96.1560),
];

// ============================================================================
// Townships covered by the default region groups
// ============================================================================

pub const EAST_CENTRAL: &[Location] = &[
    Location::new("Tarmwe", 16.8055, 96.1786),
    Location::new("Bahan", 16.8130, 96.1560),
    Location::new("Yankin", 16.8390, 96.1640),
    Location::new("Dagon", 16.7900, 96.1450),
    Location::new("Thaketa", 16.7950, 96.2010),
];

pub const NORTH_EAST: &[Location] = &[
    Location::new("Thingangyun", 16.8300, 96.1930),
    Location::new("South Okkalapa", 16.8480, 96.1810),
    Location::new("North Dagon", 16.8800, 96.2000),
    Location::new("South Dagon", 16.8600, 96.2300),
    Location::new("East Dagon", 16.9100, 96.2400),
];

pub const WEST: &[Location] = &[
    Location::new("Hlaing", 16.8500, 96.1250),
    Location::new("Insein", 16.8900, 96.1000),
    Location::new("Hlaing Tharyar", 16.8700, 96.0600),
    Location::new("Sanchaung", 16.8000, 96.1300),
    Location::new("Kamaryut", 16.8300, 96.1300),
];

pub const DOWNTOWN: &[Location] = &[
    Location::new("Lanmadaw", 16.7790, 96.1460),
    Location::new("Latha", 16.7770, 96.1530),
    Location::new("Pazundaung", 16.7880, 96.1720),
    Location::new("Botahtaung", 16.7740, 96.1700),
    Location::new("Kyauktada", 16.7750, 96.1600),
    Location::new("Mingalar Taung Nyunt", 16.7930, 96.1680),
];

/// Townships outside every default group.
pub const UNGROUPED: &[Location] = &[
    Location::new("Mayangone", 16.8700, 96.1400),
    Location::new("Dala", 16.7600, 96.1600),
];

pub fn shelters() -> Vec<Depot> {
    SHELTERS
        .iter()
        .enumerate()
        .map(|(i, loc)| Depot::new(i as u64 + 1, loc.name, loc.point()))
        .collect()
}

/// One report per township, ids starting at 100, region = township name.
pub fn township_reports(locations: &[&[Location]]) -> Vec<Report> {
    locations
        .iter()
        .flat_map(|group| group.iter())
        .enumerate()
        .map(|(i, loc)| {
            Report::new(
                100 + i as u64,
                loc.point(),
                loc.name,
                format!("Stray dog near {}", loc.name),
            )
        })
        .collect()
}

pub fn all_reports() -> Vec<Report> {
    township_reports(&[EAST_CENTRAL, NORTH_EAST, WEST, DOWNTOWN, UNGROUPED])
}
