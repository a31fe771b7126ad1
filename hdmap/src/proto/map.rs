//! The subset of `apollo.hdmap.Map` (and `apollo.common.PointENU`) that gets read and written.
//! Field numbers follow Apollo's proto2 schema; fields this crate never uses are left out and
//! skipped when decoding.

use prost::{Message, Oneof};

use crate::{
    BoundaryType, LaneDirection, LaneTurn, LaneType, RoadType, SignalType, StopSignType,
};

#[derive(Clone, PartialEq, Message)]
pub struct Id {
    #[prost(string, optional, tag = "1")]
    pub id: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct PointEnu {
    #[prost(double, optional, tag = "1")]
    pub x: Option<f64>,
    #[prost(double, optional, tag = "2")]
    pub y: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub z: Option<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Projection {
    #[prost(string, optional, tag = "1")]
    pub proj: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Header {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub version: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub date: Option<Vec<u8>>,
    #[prost(message, optional, tag = "3")]
    pub projection: Option<Projection>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub district: Option<Vec<u8>>,
    #[prost(double, optional, tag = "8")]
    pub left: Option<f64>,
    #[prost(double, optional, tag = "9")]
    pub top: Option<f64>,
    #[prost(double, optional, tag = "10")]
    pub right: Option<f64>,
    #[prost(double, optional, tag = "11")]
    pub bottom: Option<f64>,
    #[prost(bytes = "vec", optional, tag = "12")]
    pub vendor: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Polygon {
    #[prost(message, repeated, tag = "1")]
    pub point: Vec<PointEnu>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LineSegment {
    #[prost(message, repeated, tag = "1")]
    pub point: Vec<PointEnu>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CurveSegment {
    #[prost(oneof = "curve_segment::CurveType", tags = "1")]
    pub curve_type: Option<curve_segment::CurveType>,
    #[prost(double, optional, tag = "6")]
    pub s: Option<f64>,
    #[prost(message, optional, tag = "7")]
    pub start_position: Option<PointEnu>,
    #[prost(double, optional, tag = "8")]
    pub heading: Option<f64>,
    #[prost(double, optional, tag = "9")]
    pub length: Option<f64>,
}

pub mod curve_segment {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum CurveType {
        #[prost(message, tag = "1")]
        LineSegment(LineSegment),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Curve {
    #[prost(message, repeated, tag = "1")]
    pub segment: Vec<CurveSegment>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LaneBoundaryType {
    #[prost(double, optional, tag = "1")]
    pub s: Option<f64>,
    #[prost(enumeration = "BoundaryType", repeated, packed = "false", tag = "2")]
    pub types: Vec<i32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct LaneBoundary {
    #[prost(message, optional, tag = "1")]
    pub curve: Option<Curve>,
    #[prost(double, optional, tag = "2")]
    pub length: Option<f64>,
    #[prost(bool, optional, tag = "3")]
    pub is_virtual: Option<bool>,
    #[prost(message, repeated, tag = "4")]
    pub boundary_type: Vec<LaneBoundaryType>,
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct LaneSampleAssociation {
    #[prost(double, optional, tag = "1")]
    pub s: Option<f64>,
    #[prost(double, optional, tag = "2")]
    pub width: Option<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Lane {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, optional, tag = "2")]
    pub central_curve: Option<Curve>,
    #[prost(message, optional, tag = "3")]
    pub left_boundary: Option<LaneBoundary>,
    #[prost(message, optional, tag = "4")]
    pub right_boundary: Option<LaneBoundary>,
    #[prost(double, optional, tag = "5")]
    pub length: Option<f64>,
    #[prost(double, optional, tag = "6")]
    pub speed_limit: Option<f64>,
    #[prost(message, repeated, tag = "7")]
    pub overlap_id: Vec<Id>,
    #[prost(message, repeated, tag = "8")]
    pub predecessor_id: Vec<Id>,
    #[prost(message, repeated, tag = "9")]
    pub successor_id: Vec<Id>,
    #[prost(message, repeated, tag = "10")]
    pub left_neighbor_forward_lane_id: Vec<Id>,
    #[prost(message, repeated, tag = "11")]
    pub right_neighbor_forward_lane_id: Vec<Id>,
    #[prost(enumeration = "LaneType", optional, tag = "12")]
    pub r#type: Option<i32>,
    #[prost(enumeration = "LaneTurn", optional, tag = "13")]
    pub turn: Option<i32>,
    #[prost(message, repeated, tag = "14")]
    pub left_neighbor_reverse_lane_id: Vec<Id>,
    #[prost(message, repeated, tag = "15")]
    pub right_neighbor_reverse_lane_id: Vec<Id>,
    #[prost(message, optional, tag = "16")]
    pub junction_id: Option<Id>,
    #[prost(message, repeated, tag = "17")]
    pub left_sample: Vec<LaneSampleAssociation>,
    #[prost(message, repeated, tag = "18")]
    pub right_sample: Vec<LaneSampleAssociation>,
    #[prost(enumeration = "LaneDirection", optional, tag = "19")]
    pub direction: Option<i32>,
    #[prost(message, repeated, tag = "20")]
    pub left_road_sample: Vec<LaneSampleAssociation>,
    #[prost(message, repeated, tag = "21")]
    pub right_road_sample: Vec<LaneSampleAssociation>,
    #[prost(message, repeated, tag = "22")]
    pub self_reverse_lane_id: Vec<Id>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RoadSection {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub lane_id: Vec<Id>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Road {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub section: Vec<RoadSection>,
    #[prost(message, optional, tag = "3")]
    pub junction_id: Option<Id>,
    #[prost(enumeration = "RoadType", optional, tag = "4")]
    pub r#type: Option<i32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Junction {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, optional, tag = "2")]
    pub polygon: Option<Polygon>,
    #[prost(message, repeated, tag = "3")]
    pub overlap_id: Vec<Id>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Signal {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, optional, tag = "2")]
    pub boundary: Option<Polygon>,
    #[prost(message, repeated, tag = "4")]
    pub overlap_id: Vec<Id>,
    #[prost(enumeration = "SignalType", optional, tag = "5")]
    pub r#type: Option<i32>,
    #[prost(message, repeated, tag = "6")]
    pub stop_line: Vec<Curve>,
}

#[derive(Clone, PartialEq, Message)]
pub struct StopSign {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub stop_line: Vec<Curve>,
    #[prost(message, repeated, tag = "3")]
    pub overlap_id: Vec<Id>,
    #[prost(enumeration = "StopSignType", optional, tag = "4")]
    pub r#type: Option<i32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Crosswalk {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, optional, tag = "2")]
    pub polygon: Option<Polygon>,
    #[prost(message, repeated, tag = "3")]
    pub overlap_id: Vec<Id>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ClearArea {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub overlap_id: Vec<Id>,
    #[prost(message, optional, tag = "3")]
    pub polygon: Option<Polygon>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SpeedBump {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub overlap_id: Vec<Id>,
    #[prost(message, repeated, tag = "3")]
    pub position: Vec<Curve>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ParkingSpace {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, optional, tag = "2")]
    pub polygon: Option<Polygon>,
    #[prost(message, repeated, tag = "3")]
    pub overlap_id: Vec<Id>,
    #[prost(double, optional, tag = "4")]
    pub heading: Option<f64>,
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct LaneOverlapInfo {
    #[prost(double, optional, tag = "1")]
    pub start_s: Option<f64>,
    #[prost(double, optional, tag = "2")]
    pub end_s: Option<f64>,
    #[prost(bool, optional, tag = "3")]
    pub is_merge: Option<bool>,
}

/// All the non-lane overlap infos carry nothing this crate reads.
#[derive(Clone, Copy, PartialEq, Message)]
pub struct EmptyOverlapInfo {}

#[derive(Clone, PartialEq, Message)]
pub struct ObjectOverlapInfo {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(
        oneof = "object_overlap_info::OverlapInfo",
        tags = "3, 4, 5, 6, 7, 9, 10, 11"
    )]
    pub overlap_info: Option<object_overlap_info::OverlapInfo>,
}

pub mod object_overlap_info {
    use super::*;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum OverlapInfo {
        #[prost(message, tag = "3")]
        LaneOverlapInfo(LaneOverlapInfo),
        #[prost(message, tag = "4")]
        SignalOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "5")]
        StopSignOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "6")]
        CrosswalkOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "7")]
        JunctionOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "9")]
        ClearAreaOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "10")]
        SpeedBumpOverlapInfo(EmptyOverlapInfo),
        #[prost(message, tag = "11")]
        ParkingSpaceOverlapInfo(EmptyOverlapInfo),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Overlap {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Id>,
    #[prost(message, repeated, tag = "2")]
    pub object: Vec<ObjectOverlapInfo>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Map {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,
    #[prost(message, repeated, tag = "2")]
    pub crosswalk: Vec<Crosswalk>,
    #[prost(message, repeated, tag = "3")]
    pub junction: Vec<Junction>,
    #[prost(message, repeated, tag = "4")]
    pub lane: Vec<Lane>,
    #[prost(message, repeated, tag = "5")]
    pub stop_sign: Vec<StopSign>,
    #[prost(message, repeated, tag = "6")]
    pub signal: Vec<Signal>,
    #[prost(message, repeated, tag = "8")]
    pub overlap: Vec<Overlap>,
    #[prost(message, repeated, tag = "9")]
    pub clear_area: Vec<ClearArea>,
    #[prost(message, repeated, tag = "10")]
    pub speed_bump: Vec<SpeedBump>,
    #[prost(message, repeated, tag = "11")]
    pub road: Vec<Road>,
    #[prost(message, repeated, tag = "12")]
    pub parking_space: Vec<ParkingSpace>,
}
