//! Report-to-depot assignment.
//!
//! Reports are grouped primarily by region: region group `i` feeds the depot
//! at position `i`. Reports whose region is not in any group (or whose group
//! has no depot) fall back to the nearest depot by great-circle distance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ValidationError;
use crate::haversine::nearest_km;
use crate::model::{Cluster, Depot, Report};

/// Named regions routed from the same depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGroup {
    pub regions: Vec<String>,
}

impl RegionGroup {
    pub fn new<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered region groups with a lookup index.
///
/// A region may appear in at most one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RegionGroup>", into = "Vec<RegionGroup>")]
pub struct RegionGroups {
    groups: Vec<RegionGroup>,
    index: HashMap<String, usize>,
}

impl RegionGroups {
    pub fn new(groups: Vec<RegionGroup>) -> Result<Self, ValidationError> {
        let mut index = HashMap::new();
        for (group_index, group) in groups.iter().enumerate() {
            for region in &group.regions {
                let key = normalize(region);
                if let Some(&first) = index.get(&key) {
                    if first != group_index {
                        return Err(ValidationError::DuplicateRegion {
                            region: region.clone(),
                            first,
                            second: group_index,
                        });
                    }
                }
                index.insert(key, group_index);
            }
        }
        Ok(Self { groups, index })
    }

    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Four township groups covering central Yangon.
    pub fn yangon() -> Self {
        let groups = vec![
            RegionGroup::new(["Tarmwe", "Bahan", "Yankin", "Dagon", "Thaketa"]),
            RegionGroup::new([
                "Thingangyun",
                "South Okkalapa",
                "North Dagon",
                "South Dagon",
                "East Dagon",
            ]),
            RegionGroup::new(["Hlaing", "Insein", "Hlaing Tharyar", "Sanchaung", "Kamaryut"]),
            RegionGroup::new([
                "Lanmadaw",
                "Latha",
                "Pazundaung",
                "Botahtaung",
                "Kyauktada",
                "Mingalar Taung Nyunt",
            ]),
        ];
        Self::new(groups).unwrap_or_else(|_| Self::empty())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[RegionGroup] {
        &self.groups
    }

    /// Group index for a region name, ignoring surrounding whitespace and
    /// ASCII case.
    pub fn group_of(&self, region: &str) -> Option<usize> {
        self.index.get(&normalize(region)).copied()
    }
}

impl Default for RegionGroups {
    fn default() -> Self {
        Self::yangon()
    }
}

impl TryFrom<Vec<RegionGroup>> for RegionGroups {
    type Error = ValidationError;

    fn try_from(groups: Vec<RegionGroup>) -> Result<Self, Self::Error> {
        Self::new(groups)
    }
}

impl From<RegionGroups> for Vec<RegionGroup> {
    fn from(groups: RegionGroups) -> Self {
        groups.groups
    }
}

fn normalize(region: &str) -> String {
    region.trim().to_ascii_lowercase()
}

/// Partitions `reports` into one cluster per depot, in depot order.
///
/// Every report ends up in exactly one cluster. Groups beyond the number of
/// depots are ignored and their reports take the nearest-depot fallback.
pub fn compute_clusters(
    reports: &[Report],
    depots: &[Depot],
    groups: &RegionGroups,
) -> Result<Vec<Cluster>, ValidationError> {
    for depot in depots {
        depot.location.validate(depot.id)?;
    }
    for report in reports {
        report.location.validate(report.id)?;
    }
    if depots.is_empty() && !reports.is_empty() {
        return Err(ValidationError::NoDepots {
            reports: reports.len(),
        });
    }

    let depot_points: Vec<_> = depots.iter().map(|depot| depot.location).collect();
    let mut clusters: Vec<Cluster> = depots
        .iter()
        .enumerate()
        .map(|(depot_index, depot)| Cluster {
            depot_index,
            depot: depot.clone(),
            reports: Vec::new(),
        })
        .collect();

    let mut fallback = 0usize;
    for report in reports {
        let by_region = groups
            .group_of(&report.region)
            .filter(|&index| index < depots.len());

        let index = match by_region {
            Some(index) => index,
            None => {
                fallback += 1;
                let (index, km) = nearest_km(report.location, &depot_points).ok_or(
                    ValidationError::NoDepots {
                        reports: reports.len(),
                    },
                )?;
                trace!(report = %report.id, region = %report.region, depot_index = index, km, "nearest depot fallback");
                index
            }
        };

        clusters[index].reports.push(report.clone());
    }

    debug!(
        reports = reports.len(),
        depots = depots.len(),
        fallback,
        "reports clustered"
    );

    Ok(clusters)
}
