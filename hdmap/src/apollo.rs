//! The Apollo HD map object graph, in ENU meters. This is what the builders produce and the
//! codec serializes; the JSON mirror of a map is just this, rendered with serde.

use serde::{Deserialize, Serialize};

use geom::Pt2D;

use crate::{
    BoundaryType, LaneDirection, LaneTurn, LaneType, RoadType, SignalType, StopSignType,
};

pub const VENDOR: &str = "Apollo Map Editor";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointENU {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PointENU {
    pub fn new(x: f64, y: f64) -> PointENU {
        PointENU { x, y, z: 0.0 }
    }

    pub fn to_pt2d(self) -> Pt2D {
        Pt2D::new(self.x, self.y)
    }
}

impl From<Pt2D> for PointENU {
    fn from(pt: Pt2D) -> Self {
        PointENU::new(pt.x(), pt.y())
    }
}

pub fn to_pt2ds(pts: &[PointENU]) -> Vec<Pt2D> {
    pts.iter().map(|pt| pt.to_pt2d()).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub version: String,
    pub date: String,
    pub projection: String,
    pub district: String,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub vendor: String,
}

/// One piece of a curve. Apollo allows other kinds of segments, but only line segments are
/// ever produced or read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub points: Vec<PointENU>,
    pub s: f64,
    pub start_position: PointENU,
    /// Radians, counter-clockwise from east
    pub heading: f64,
    pub length: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub segments: Vec<CurveSegment>,
}

impl Curve {
    /// All points of every segment, in order.
    pub fn points(&self) -> Vec<PointENU> {
        self.segments
            .iter()
            .flat_map(|seg| seg.points.iter().copied())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneBoundaryType {
    pub s: f64,
    pub types: Vec<BoundaryType>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneBoundary {
    pub curve: Curve,
    pub length: f64,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub boundary_types: Vec<LaneBoundaryType>,
}

impl LaneBoundary {
    /// The first type listed, or UNKNOWN.
    pub fn first_type(&self) -> BoundaryType {
        self.boundary_types
            .first()
            .and_then(|bt| bt.types.first().copied())
            .unwrap_or(BoundaryType::Unknown)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneSampleAssociation {
    pub s: f64,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: String,
    pub central_curve: Curve,
    pub left_boundary: LaneBoundary,
    pub right_boundary: LaneBoundary,
    pub length: f64,
    pub speed_limit: f64,
    pub overlap_ids: Vec<String>,
    pub predecessor_ids: Vec<String>,
    pub successor_ids: Vec<String>,
    pub left_neighbor_forward_lane_ids: Vec<String>,
    pub right_neighbor_forward_lane_ids: Vec<String>,
    pub left_neighbor_reverse_lane_ids: Vec<String>,
    pub right_neighbor_reverse_lane_ids: Vec<String>,
    pub self_reverse_lane_ids: Vec<String>,
    pub lane_type: LaneType,
    pub turn: LaneTurn,
    pub direction: LaneDirection,
    pub junction_id: Option<String>,
    pub left_samples: Vec<LaneSampleAssociation>,
    pub right_samples: Vec<LaneSampleAssociation>,
    pub left_road_samples: Vec<LaneSampleAssociation>,
    pub right_road_samples: Vec<LaneSampleAssociation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSection {
    pub id: String,
    pub lane_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: String,
    pub sections: Vec<RoadSection>,
    pub junction_id: Option<String>,
    pub road_type: RoadType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: String,
    pub polygon: Vec<PointENU>,
    pub overlap_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub boundary: Vec<PointENU>,
    pub overlap_ids: Vec<String>,
    pub signal_type: SignalType,
    pub stop_lines: Vec<Curve>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopSign {
    pub id: String,
    pub stop_lines: Vec<Curve>,
    pub overlap_ids: Vec<String>,
    pub stop_sign_type: StopSignType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crosswalk {
    pub id: String,
    pub polygon: Vec<PointENU>,
    pub overlap_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearArea {
    pub id: String,
    pub polygon: Vec<PointENU>,
    pub overlap_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedBump {
    pub id: String,
    pub positions: Vec<Curve>,
    pub overlap_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpace {
    pub id: String,
    pub polygon: Vec<PointENU>,
    pub overlap_ids: Vec<String>,
    pub heading: Option<f64>,
}

/// What one side of an overlap is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlapInfo {
    Lane {
        start_s: f64,
        end_s: f64,
        is_merge: bool,
    },
    Signal,
    StopSign,
    Crosswalk,
    Junction,
    ClearArea,
    SpeedBump,
    ParkingSpace,
}

impl OverlapInfo {
    /// The kind of element the object refers to, spelled like `MapElement::kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            OverlapInfo::Lane { .. } => "lane",
            OverlapInfo::Signal => "signal",
            OverlapInfo::StopSign => "stop_sign",
            OverlapInfo::Crosswalk => "crosswalk",
            OverlapInfo::Junction => "junction",
            OverlapInfo::ClearArea => "clear_area",
            OverlapInfo::SpeedBump => "speed_bump",
            OverlapInfo::ParkingSpace => "parking_space",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlapObject {
    pub id: String,
    pub info: OverlapInfo,
}

/// Built overlaps always have a lane object first and the other element second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub id: String,
    pub objects: Vec<OverlapObject>,
}

impl Overlap {
    /// The lane side of the overlap, if there is one: (lane id, start_s, end_s).
    pub fn lane_range(&self) -> Option<(&str, f64, f64)> {
        self.objects.iter().find_map(|obj| match obj.info {
            OverlapInfo::Lane { start_s, end_s, .. } => Some((obj.id.as_str(), start_s, end_s)),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApolloMap {
    pub header: Header,
    pub crosswalks: Vec<Crosswalk>,
    pub junctions: Vec<Junction>,
    pub lanes: Vec<Lane>,
    pub stop_signs: Vec<StopSign>,
    pub signals: Vec<Signal>,
    pub overlaps: Vec<Overlap>,
    pub clear_areas: Vec<ClearArea>,
    pub speed_bumps: Vec<SpeedBump>,
    pub roads: Vec<Road>,
    pub parking_spaces: Vec<ParkingSpace>,
}

impl ApolloMap {
    pub fn lane(&self, id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} lanes, {} roads, {} junctions, {} signals, {} stop signs, {} crosswalks, {} clear areas, {} speed bumps, {} parking spaces, {} overlaps",
            self.lanes.len(),
            self.roads.len(),
            self.junctions.len(),
            self.signals.len(),
            self.stop_signs.len(),
            self.crosswalks.len(),
            self.clear_areas.len(),
            self.speed_bumps.len(),
            self.parking_spaces.len(),
            self.overlaps.len()
        )
    }
}
