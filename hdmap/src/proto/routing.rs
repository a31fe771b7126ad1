//! `apollo.routing.Graph` from `topo_graph.proto`.

use prost::Message;

use super::map::Curve;
use crate::EdgeDirection;

#[derive(Clone, Copy, PartialEq, Message)]
pub struct CurvePoint {
    #[prost(double, optional, tag = "1")]
    pub s: Option<f64>,
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct CurveRange {
    #[prost(message, optional, tag = "1")]
    pub start: Option<CurvePoint>,
    #[prost(message, optional, tag = "2")]
    pub end: Option<CurvePoint>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Node {
    #[prost(string, optional, tag = "1")]
    pub lane_id: Option<String>,
    #[prost(double, optional, tag = "2")]
    pub length: Option<f64>,
    #[prost(message, repeated, tag = "3")]
    pub left_out: Vec<CurveRange>,
    #[prost(message, repeated, tag = "4")]
    pub right_out: Vec<CurveRange>,
    #[prost(double, optional, tag = "5")]
    pub cost: Option<f64>,
    #[prost(message, optional, tag = "6")]
    pub central_curve: Option<Curve>,
    /// Apollo defaults this to true when absent.
    #[prost(bool, optional, tag = "7")]
    pub is_virtual: Option<bool>,
    #[prost(string, optional, tag = "8")]
    pub road_id: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Edge {
    #[prost(string, optional, tag = "1")]
    pub from_lane_id: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub to_lane_id: Option<String>,
    #[prost(double, optional, tag = "3")]
    pub cost: Option<f64>,
    #[prost(enumeration = "EdgeDirection", optional, tag = "4")]
    pub direction_type: Option<i32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Graph {
    #[prost(string, optional, tag = "1")]
    pub hdmap_version: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub hdmap_district: Option<String>,
    #[prost(message, repeated, tag = "3")]
    pub node: Vec<Node>,
    #[prost(message, repeated, tag = "4")]
    pub edge: Vec<Edge>,
}
