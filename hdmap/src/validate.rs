//! Sanity checks on an editor map before it's built: broken references, odd topology, and
//! colliding ids.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EditorMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: String,
    pub element_id: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.category, self.element_id, self.message
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_lanes: usize,
    /// Every successor reference counts once
    pub total_connections: usize,
    pub isolated_lanes: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.stats.error_count > 0
    }

    fn push(&mut self, severity: Severity, category: &str, element_id: &str, message: String) {
        self.issues.push(Issue {
            severity,
            category: category.to_string(),
            element_id: element_id.to_string(),
            message,
        });
    }
}

pub fn validate_map(map: &EditorMap) -> ValidationReport {
    let mut report = ValidationReport::default();
    let roads: BTreeSet<&str> = map.roads.iter().map(|r| r.id.as_str()).collect();

    for lane in &map.lanes {
        report.stats.total_connections += lane.successor_ids.len();

        if lane.successor_ids.is_empty()
            && lane.predecessor_ids.is_empty()
            && lane.left_neighbor_ids.is_empty()
            && lane.right_neighbor_ids.is_empty()
        {
            report.push(
                Severity::Warning,
                "Topology",
                &lane.id,
                "Lane has no connections (isolated)".to_string(),
            );
            report.stats.isolated_lanes += 1;
        }

        if lane.successor_ids.contains(&lane.id) || lane.predecessor_ids.contains(&lane.id) {
            report.push(
                Severity::Error,
                "Topology",
                &lane.id,
                "Lane is connected to itself".to_string(),
            );
        }

        for succ in &lane.successor_ids {
            if map.lane(succ).is_none() {
                report.push(
                    Severity::Error,
                    "Reference",
                    &lane.id,
                    format!("Successor \"{}\" does not exist", succ),
                );
            }
        }
        for pred in &lane.predecessor_ids {
            if map.lane(pred).is_none() {
                report.push(
                    Severity::Error,
                    "Reference",
                    &lane.id,
                    format!("Predecessor \"{}\" does not exist", pred),
                );
            }
        }

        for succ in &lane.successor_ids {
            if let Some(other) = map.lane(succ) {
                if !other.predecessor_ids.contains(&lane.id) {
                    report.push(
                        Severity::Warning,
                        "Topology",
                        &lane.id,
                        format!(
                            "Asymmetric connection: successor \"{}\" does not list this lane as predecessor",
                            succ
                        ),
                    );
                }
            }
        }

        match lane.road_id {
            None => report.push(
                Severity::Info,
                "Organization",
                &lane.id,
                "Lane is not assigned to any road".to_string(),
            ),
            Some(ref road) if !roads.contains(road.as_str()) => report.push(
                Severity::Error,
                "Reference",
                &lane.id,
                format!("Assigned road \"{}\" does not exist", road),
            ),
            Some(_) => {}
        }
    }

    // The message names the most recent previous user of the id
    let mut seen: BTreeMap<&str, &'static str> = BTreeMap::new();
    for (id, kind) in map.ids() {
        if let Some(existing) = seen.insert(id, kind) {
            report.push(
                Severity::Error,
                "IDs",
                id,
                format!("Duplicate ID found: used by both {} and {}", existing, kind),
            );
        }
    }

    report.stats.total_lanes = map.lanes.len();
    for issue in &report.issues {
        match issue.severity {
            Severity::Error => report.stats.error_count += 1,
            Severity::Warning => report.stats.warning_count += 1,
            Severity::Info => report.stats.info_count += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CrosswalkFeature, LaneFeature, RoadDefinition, RoadType};
    use geom::LonLat;

    fn lane(id: &str) -> LaneFeature {
        LaneFeature::new(
            id,
            &[LonLat::new(-122.0, 37.0), LonLat::new(-122.0, 37.001)],
        )
    }

    fn messages(report: &ValidationReport, id: &str) -> Vec<String> {
        report
            .issues
            .iter()
            .filter(|i| i.element_id == id)
            .map(|i| i.message.clone())
            .collect()
    }

    #[test]
    fn clean_map() {
        let mut map = EditorMap::new();
        let mut a = lane("a");
        a.successor_ids = vec!["b".to_string()];
        a.road_id = Some("r".to_string());
        let mut b = lane("b");
        b.predecessor_ids = vec!["a".to_string()];
        b.road_id = Some("r".to_string());
        map.lanes = vec![a, b];
        map.roads.push(RoadDefinition {
            id: "r".to_string(),
            name: "r".to_string(),
            road_type: RoadType::CityRoad,
        });

        let report = validate_map(&map);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.stats.total_lanes, 2);
        assert_eq!(report.stats.total_connections, 1);
    }

    #[test]
    fn topology_problems() {
        let mut map = EditorMap::new();
        let mut a = lane("a");
        a.successor_ids = vec!["a".to_string(), "b".to_string(), "ghost".to_string()];
        a.road_id = Some("nowhere".to_string());
        map.lanes.push(a);
        map.lanes.push(lane("b"));

        let report = validate_map(&map);
        assert_eq!(
            messages(&report, "a"),
            vec![
                "Lane is connected to itself",
                "Successor \"ghost\" does not exist",
                "Asymmetric connection: successor \"a\" does not list this lane as predecessor",
                "Asymmetric connection: successor \"b\" does not list this lane as predecessor",
                "Assigned road \"nowhere\" does not exist",
            ]
        );
        assert_eq!(
            messages(&report, "b"),
            vec![
                "Lane has no connections (isolated)",
                "Lane is not assigned to any road",
            ]
        );
        assert_eq!(report.stats.isolated_lanes, 1);
        assert_eq!(report.stats.total_connections, 3);
        assert_eq!(report.stats.error_count, 3);
        assert_eq!(report.stats.warning_count, 3);
        assert_eq!(report.stats.info_count, 1);
        assert!(report.has_errors());
    }

    #[test]
    fn duplicate_ids() {
        let mut map = EditorMap::new();
        map.lanes.push(lane("x"));
        map.crosswalks.push(CrosswalkFeature::new(
            "x",
            &[
                LonLat::new(-122.0, 37.0),
                LonLat::new(-122.0, 37.001),
                LonLat::new(-121.999, 37.001),
            ],
        ));
        let report = validate_map(&map);
        let dup: Vec<&Issue> = report.issues.iter().filter(|i| i.category == "IDs").collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(
            dup[0].message,
            "Duplicate ID found: used by both lane and crosswalk"
        );
        assert_eq!(dup[0].severity, Severity::Error);
    }
}
