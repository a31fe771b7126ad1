use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ApolloMap, CurveRange, EdgeDirection, Lane, LaneBoundary, LaneTurn, TopoEdge, TopoGraph,
    TopoNode,
};

/// Tunes how the router weighs lanes and lane changes. The defaults match Apollo's
/// `routing_config.pb.txt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// m/s
    pub base_speed: f64,
    pub left_turn_penalty: f64,
    pub right_turn_penalty: f64,
    pub uturn_penalty: f64,
    pub change_penalty: f64,
    /// Meters. Lane changes with less room than this cost more.
    pub base_changing_length: f64,
}

impl Default for RoutingConfig {
    fn default() -> RoutingConfig {
        RoutingConfig {
            base_speed: 4.167,
            left_turn_penalty: 50.0,
            right_turn_penalty: 20.0,
            uturn_penalty: 100.0,
            change_penalty: 500.0,
            base_changing_length: 50.0,
        }
    }
}

impl RoutingConfig {
    fn node_cost(&self, lane: &Lane) -> f64 {
        let speed = if lane.speed_limit > 0.0 {
            lane.speed_limit
        } else {
            self.base_speed
        };
        let ratio = if speed >= self.base_speed {
            (self.base_speed / speed).sqrt()
        } else {
            1.0
        };
        let penalty = match lane.turn {
            LaneTurn::LeftTurn => self.left_turn_penalty,
            LaneTurn::RightTurn => self.right_turn_penalty,
            LaneTurn::UTurn => self.uturn_penalty,
            LaneTurn::NoTurn => 0.0,
        };
        lane_length(lane) * ratio + penalty
    }

    fn lane_change_cost(&self, changing_length: f64) -> f64 {
        if changing_length <= 0.0 {
            return self.change_penalty;
        }
        let ratio = if changing_length < self.base_changing_length {
            (changing_length / self.base_changing_length).powf(-1.5)
        } else {
            1.0
        };
        self.change_penalty * ratio
    }
}

/// One node per lane, then FORWARD edges to every successor, then LEFT and RIGHT edges to
/// neighbors that can be reached across a dotted line.
pub fn build_routing_map(map: &ApolloMap, config: &RoutingConfig) -> TopoGraph {
    let mut road_per_lane: BTreeMap<&str, &str> = BTreeMap::new();
    for road in &map.roads {
        for section in &road.sections {
            for lane in &section.lane_ids {
                road_per_lane.insert(lane, &road.id);
            }
        }
    }

    let mut graph = TopoGraph {
        hdmap_version: map.header.version.clone(),
        hdmap_district: map.header.district.clone(),
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    for lane in &map.lanes {
        let length = lane_length(lane);
        graph.nodes.push(TopoNode {
            lane_id: lane.id.clone(),
            length,
            left_out: out_ranges(&lane.left_boundary, length),
            right_out: out_ranges(&lane.right_boundary, length),
            cost: config.node_cost(lane),
            central_curve: lane.central_curve.clone(),
            is_virtual: is_virtual(lane),
            road_id: road_per_lane
                .get(lane.id.as_str())
                .map(|r| r.to_string())
                .unwrap_or_default(),
        });
    }

    for lane in &map.lanes {
        for succ in &lane.successor_ids {
            graph.edges.push(TopoEdge {
                from_lane_id: lane.id.clone(),
                to_lane_id: succ.clone(),
                cost: 0.0,
                direction: EdgeDirection::Forward,
            });
        }
    }

    for lane in &map.lanes {
        let length = lane_length(lane);
        for (neighbors, boundary, direction) in [
            (
                &lane.left_neighbor_forward_lane_ids,
                &lane.left_boundary,
                EdgeDirection::Left,
            ),
            (
                &lane.right_neighbor_forward_lane_ids,
                &lane.right_boundary,
                EdgeDirection::Right,
            ),
        ] {
            let changing_length: f64 = out_ranges(boundary, length)
                .iter()
                .map(|r| r.end - r.start)
                .sum();
            if changing_length <= 0.0 {
                continue;
            }
            for neighbor in neighbors {
                graph.edges.push(TopoEdge {
                    from_lane_id: lane.id.clone(),
                    to_lane_id: neighbor.clone(),
                    cost: config.lane_change_cost(changing_length),
                    direction,
                });
            }
        }
    }

    info!(
        "Built routing graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}

/// The recorded length, or the sum of the central curve's segments when that's missing.
fn lane_length(lane: &Lane) -> f64 {
    if lane.length > 0.0 {
        lane.length
    } else {
        lane.central_curve.segments.iter().map(|seg| seg.length).sum()
    }
}

/// Where a lane may be left across this boundary. Only dotted lines allow it, and then along
/// the whole lane.
fn out_ranges(boundary: &LaneBoundary, length: f64) -> Vec<CurveRange> {
    if boundary.first_type().allows_lane_change() {
        vec![CurveRange {
            start: 0.0,
            end: length,
        }]
    } else {
        Vec::new()
    }
}

/// Lanes inside a junction without any neighbors exist only to connect roads.
fn is_virtual(lane: &Lane) -> bool {
    lane.junction_id.is_some()
        && lane.left_neighbor_forward_lane_ids.is_empty()
        && lane.right_neighbor_forward_lane_ids.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make::base_map::make_curve;
    use crate::{
        BoundaryType, Header, LaneBoundaryType, LaneDirection, LaneType, PointENU, Road,
        RoadSection, RoadType,
    };

    fn boundary(bt: BoundaryType) -> LaneBoundary {
        LaneBoundary {
            curve: Default::default(),
            length: 10.0,
            is_virtual: false,
            boundary_types: vec![LaneBoundaryType {
                s: 0.0,
                types: vec![bt],
            }],
        }
    }

    fn lane(id: &str, length: f64) -> Lane {
        Lane {
            id: id.to_string(),
            central_curve: make_curve(
                vec![PointENU::new(0.0, 0.0), PointENU::new(0.0, length)],
                0.0,
            ),
            left_boundary: boundary(BoundaryType::DottedWhite),
            right_boundary: boundary(BoundaryType::SolidWhite),
            length,
            speed_limit: 4.167,
            overlap_ids: Vec::new(),
            predecessor_ids: Vec::new(),
            successor_ids: Vec::new(),
            left_neighbor_forward_lane_ids: Vec::new(),
            right_neighbor_forward_lane_ids: Vec::new(),
            left_neighbor_reverse_lane_ids: Vec::new(),
            right_neighbor_reverse_lane_ids: Vec::new(),
            self_reverse_lane_ids: Vec::new(),
            lane_type: LaneType::CityDriving,
            turn: LaneTurn::NoTurn,
            direction: LaneDirection::Forward,
            junction_id: None,
            left_samples: Vec::new(),
            right_samples: Vec::new(),
            left_road_samples: Vec::new(),
            right_road_samples: Vec::new(),
        }
    }

    fn map(lanes: Vec<Lane>) -> ApolloMap {
        ApolloMap {
            header: Header {
                version: "1.0.0".to_string(),
                district: "town".to_string(),
                ..Default::default()
            },
            lanes,
            ..Default::default()
        }
    }

    #[test]
    fn turn_penalties() {
        let mut left = lane("left", 30.0);
        left.turn = LaneTurn::LeftTurn;
        let straight = lane("straight", 30.0);
        let mut uturn = lane("uturn", 30.0);
        uturn.turn = LaneTurn::UTurn;
        let graph = build_routing_map(&map(vec![left, straight, uturn]), &RoutingConfig::default());

        let cost = |id| graph.node(id).unwrap().cost;
        assert!((cost("left") - cost("straight") - 50.0).abs() < 1e-9);
        assert!((cost("uturn") - cost("straight") - 100.0).abs() < 1e-9);
        // At exactly the base speed, the ratio is 1
        assert!((cost("straight") - 30.0).abs() < 1e-9);
        assert_eq!(graph.hdmap_version, "1.0.0");
        assert_eq!(graph.hdmap_district, "town");
    }

    #[test]
    fn speed_ratio() {
        let mut fast = lane("fast", 100.0);
        fast.speed_limit = 4.167 * 4.0;
        let mut slow = lane("slow", 100.0);
        slow.speed_limit = 1.0;
        let mut unknown = lane("unknown", 100.0);
        unknown.speed_limit = 0.0;
        let graph = build_routing_map(
            &map(vec![fast, slow, unknown]),
            &RoutingConfig::default(),
        );
        assert!((graph.node("fast").unwrap().cost - 50.0).abs() < 1e-9);
        assert_eq!(graph.node("slow").unwrap().cost, 100.0);
        assert_eq!(graph.node("unknown").unwrap().cost, 100.0);
    }

    #[test]
    fn edges() {
        let mut a = lane("a", 30.0);
        a.successor_ids = vec!["b".to_string()];
        a.left_neighbor_forward_lane_ids = vec!["c".to_string()];
        // The right boundary is solid
        a.right_neighbor_forward_lane_ids = vec!["d".to_string()];
        let mut c = lane("c", 80.0);
        c.left_neighbor_forward_lane_ids = vec!["a".to_string()];
        let graph = build_routing_map(
            &map(vec![a, lane("b", 10.0), c, lane("d", 10.0)]),
            &RoutingConfig::default(),
        );

        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[0].direction, EdgeDirection::Forward);
        assert_eq!(graph.edges[0].cost, 0.0);
        assert_eq!(graph.edges[1].direction, EdgeDirection::Left);
        assert_eq!(graph.edges[1].to_lane_id, "c");
        let expected = 500.0 * (30.0_f64 / 50.0).powf(-1.5);
        assert!((graph.edges[1].cost - expected).abs() < 1e-9);
        // Plenty of room to change lanes
        assert_eq!(graph.edges[2].from_lane_id, "c");
        assert_eq!(graph.edges[2].cost, 500.0);

        let node = graph.node("a").unwrap();
        assert_eq!(
            node.left_out,
            vec![CurveRange {
                start: 0.0,
                end: 30.0
            }]
        );
        assert!(node.right_out.is_empty());
        assert_eq!(graph.edges_from("a").count(), 2);
    }

    #[test]
    fn virtual_lanes_and_roads() {
        let mut connector = lane("connector", 10.0);
        connector.junction_id = Some("j".to_string());
        let mut with_neighbor = lane("with_neighbor", 10.0);
        with_neighbor.junction_id = Some("j".to_string());
        with_neighbor.right_neighbor_forward_lane_ids = vec!["connector".to_string()];
        let mut input = map(vec![connector, with_neighbor, lane("plain", 10.0)]);
        input.roads.push(Road {
            id: "r".to_string(),
            sections: vec![RoadSection {
                id: "r_section_0".to_string(),
                lane_ids: vec!["connector".to_string()],
            }],
            junction_id: None,
            road_type: RoadType::CityRoad,
        });

        let graph = build_routing_map(&input, &RoutingConfig::default());
        assert!(graph.node("connector").unwrap().is_virtual);
        assert!(!graph.node("with_neighbor").unwrap().is_virtual);
        assert!(!graph.node("plain").unwrap().is_virtual);
        assert_eq!(graph.node("connector").unwrap().road_id, "r");
        assert_eq!(graph.node("plain").unwrap().road_id, "");
    }

    #[test]
    fn config_from_json() {
        let config: RoutingConfig = serde_json::from_str(r#"{"left_turn_penalty": 70.0}"#).unwrap();
        assert_eq!(config.left_turn_penalty, 70.0);
        assert_eq!(config.base_speed, 4.167);
    }
}
