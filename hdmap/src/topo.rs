//! The routing topology graph: one node per lane, one edge per legal lane-to-lane move.

use serde::{Deserialize, Serialize};

use crate::Curve;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveRange {
    pub start: f64,
    pub end: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Enumeration)]
#[repr(i32)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeDirection {
    Forward = 0,
    Left = 1,
    Right = 2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopoNode {
    pub lane_id: String,
    pub length: f64,
    pub left_out: Vec<CurveRange>,
    pub right_out: Vec<CurveRange>,
    pub cost: f64,
    pub central_curve: Curve,
    pub is_virtual: bool,
    pub road_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopoEdge {
    pub from_lane_id: String,
    pub to_lane_id: String,
    pub cost: f64,
    pub direction: EdgeDirection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopoGraph {
    pub hdmap_version: String,
    pub hdmap_district: String,
    pub nodes: Vec<TopoNode>,
    pub edges: Vec<TopoEdge>,
}

impl TopoGraph {
    pub fn node(&self, lane_id: &str) -> Option<&TopoNode> {
        self.nodes.iter().find(|n| n.lane_id == lane_id)
    }

    pub fn edges_from<'a>(&'a self, lane_id: &'a str) -> impl Iterator<Item = &'a TopoEdge> + 'a {
        self.edges.iter().filter(move |e| e.from_lane_id == lane_id)
    }
}
