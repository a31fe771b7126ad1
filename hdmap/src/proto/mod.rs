//! The binary boundary. Everything else in the crate deals with `ApolloMap` and `TopoGraph`;
//! only this module knows about Apollo's protobuf wire format.

mod convert;
mod map;
mod routing;

use anyhow::{Context, Result};
use prost::Message;

use crate::{ApolloMap, Curve, OverlapInfo, PointENU, TopoGraph};

/// Serializes maps and routing graphs. The protobuf codec is the only real implementation, but
/// builds and imports just need something that speaks this interface.
pub trait MapCodec {
    fn encode_map(&self, map: &ApolloMap) -> Result<Vec<u8>>;
    fn decode_map(&self, bytes: &[u8]) -> Result<ApolloMap>;
    fn encode_graph(&self, graph: &TopoGraph) -> Result<Vec<u8>>;
    fn decode_graph(&self, bytes: &[u8]) -> Result<TopoGraph>;
}

/// Apollo's `apollo.hdmap.Map` and `apollo.routing.Graph` messages.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtobufCodec;

impl MapCodec for ProtobufCodec {
    fn encode_map(&self, map: &ApolloMap) -> Result<Vec<u8>> {
        for problem in verify_map(map) {
            warn!("Map verification warning: {}", problem);
        }
        Ok(convert::map_to_pb(map).encode_to_vec())
    }

    fn decode_map(&self, bytes: &[u8]) -> Result<ApolloMap> {
        let pb = map::Map::decode(bytes).context("couldn't decode apollo.hdmap.Map")?;
        Ok(convert::map_from_pb(pb))
    }

    fn encode_graph(&self, graph: &TopoGraph) -> Result<Vec<u8>> {
        for problem in verify_graph(graph) {
            warn!("Graph verification warning: {}", problem);
        }
        Ok(convert::graph_to_pb(graph).encode_to_vec())
    }

    fn decode_graph(&self, bytes: &[u8]) -> Result<TopoGraph> {
        let pb = routing::Graph::decode(bytes).context("couldn't decode apollo.routing.Graph")?;
        Ok(convert::graph_from_pb(pb))
    }
}

/// Things Apollo would choke on. None of them stop encoding.
pub fn verify_map(map: &ApolloMap) -> Vec<String> {
    let mut problems = Vec::new();

    for lane in &map.lanes {
        check_id("lane", &lane.id, &mut problems);
        check_curve(&lane.id, &lane.central_curve, &mut problems);
        check_curve(&lane.id, &lane.left_boundary.curve, &mut problems);
        check_curve(&lane.id, &lane.right_boundary.curve, &mut problems);
        if !lane.length.is_finite() {
            problems.push(format!("{} has length {}", lane.id, lane.length));
        }
    }
    for x in &map.junctions {
        check_id("junction", &x.id, &mut problems);
        check_points(&x.id, &x.polygon, &mut problems);
    }
    for x in &map.signals {
        check_id("signal", &x.id, &mut problems);
        check_points(&x.id, &x.boundary, &mut problems);
        for curve in &x.stop_lines {
            check_curve(&x.id, curve, &mut problems);
        }
    }
    for x in &map.stop_signs {
        check_id("stop sign", &x.id, &mut problems);
        for curve in &x.stop_lines {
            check_curve(&x.id, curve, &mut problems);
        }
    }
    for x in &map.crosswalks {
        check_id("crosswalk", &x.id, &mut problems);
        check_points(&x.id, &x.polygon, &mut problems);
    }
    for x in &map.clear_areas {
        check_id("clear area", &x.id, &mut problems);
        check_points(&x.id, &x.polygon, &mut problems);
    }
    for x in &map.speed_bumps {
        check_id("speed bump", &x.id, &mut problems);
        for curve in &x.positions {
            check_curve(&x.id, curve, &mut problems);
        }
    }
    for x in &map.parking_spaces {
        check_id("parking space", &x.id, &mut problems);
        check_points(&x.id, &x.polygon, &mut problems);
    }
    for x in &map.roads {
        check_id("road", &x.id, &mut problems);
    }
    for overlap in &map.overlaps {
        check_id("overlap", &overlap.id, &mut problems);
        if overlap.objects.len() != 2 {
            problems.push(format!(
                "{} has {} objects, not 2",
                overlap.id,
                overlap.objects.len()
            ));
        }
        for obj in &overlap.objects {
            if let OverlapInfo::Lane { start_s, end_s, .. } = obj.info {
                if !(start_s <= end_s) {
                    problems.push(format!(
                        "{} has start_s {} after end_s {} on {}",
                        overlap.id, start_s, end_s, obj.id
                    ));
                }
            }
        }
    }
    problems
}

pub fn verify_graph(graph: &TopoGraph) -> Vec<String> {
    let mut problems = Vec::new();
    for node in &graph.nodes {
        if node.lane_id.is_empty() {
            problems.push("a node has an empty lane_id".to_string());
        }
        if !node.cost.is_finite() || !node.length.is_finite() {
            problems.push(format!(
                "node {} has cost {} and length {}",
                node.lane_id, node.cost, node.length
            ));
        }
        check_curve(&node.lane_id, &node.central_curve, &mut problems);
    }
    for edge in &graph.edges {
        if edge.from_lane_id.is_empty() || edge.to_lane_id.is_empty() {
            problems.push(format!(
                "edge {} -> {} is missing an endpoint",
                edge.from_lane_id, edge.to_lane_id
            ));
        }
        if !edge.cost.is_finite() {
            problems.push(format!(
                "edge {} -> {} has cost {}",
                edge.from_lane_id, edge.to_lane_id, edge.cost
            ));
        }
    }
    problems
}

fn check_id(kind: &str, id: &str, problems: &mut Vec<String>) {
    if id.is_empty() {
        problems.push(format!("a {} has an empty id", kind));
    }
}

fn check_curve(id: &str, curve: &Curve, problems: &mut Vec<String>) {
    for seg in &curve.segments {
        check_points(id, &seg.points, problems);
    }
}

fn check_points(id: &str, pts: &[PointENU], problems: &mut Vec<String>) {
    if let Some(pt) = pts
        .iter()
        .find(|pt| !pt.x.is_finite() || !pt.y.is_finite() || !pt.z.is_finite())
    {
        problems.push(format!("{} has a non-finite point {:?}", id, pt));
    }
}
