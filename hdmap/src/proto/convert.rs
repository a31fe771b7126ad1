//! Moving between the object graph and its wire messages. Encoding is lossless. Decoding fills
//! in Apollo's defaults for anything absent, and enum values this crate doesn't know fall back
//! to those defaults too.

use super::map as pb;
use super::routing as pb_routing;
use crate::elements::DEFAULT_SPEED_LIMIT;
use crate::{
    ApolloMap, BoundaryType, ClearArea, Crosswalk, Curve, CurveRange, CurveSegment, EdgeDirection,
    Header, Junction, Lane, LaneBoundary, LaneBoundaryType, LaneDirection, LaneSampleAssociation,
    LaneTurn, LaneType, Overlap, OverlapInfo, OverlapObject, ParkingSpace, PointENU, Road,
    RoadSection, RoadType, Signal, SignalType, SpeedBump, StopSign, StopSignType, TopoEdge,
    TopoGraph, TopoNode,
};

pub fn map_to_pb(map: &ApolloMap) -> pb::Map {
    pb::Map {
        header: Some(header_to_pb(&map.header)),
        crosswalk: map
            .crosswalks
            .iter()
            .map(|x| pb::Crosswalk {
                id: Some(id(&x.id)),
                polygon: Some(polygon(&x.polygon)),
                overlap_id: ids(&x.overlap_ids),
            })
            .collect(),
        junction: map
            .junctions
            .iter()
            .map(|x| pb::Junction {
                id: Some(id(&x.id)),
                polygon: Some(polygon(&x.polygon)),
                overlap_id: ids(&x.overlap_ids),
            })
            .collect(),
        lane: map.lanes.iter().map(lane_to_pb).collect(),
        stop_sign: map
            .stop_signs
            .iter()
            .map(|x| pb::StopSign {
                id: Some(id(&x.id)),
                stop_line: x.stop_lines.iter().map(curve_to_pb).collect(),
                overlap_id: ids(&x.overlap_ids),
                r#type: Some(x.stop_sign_type as i32),
            })
            .collect(),
        signal: map
            .signals
            .iter()
            .map(|x| pb::Signal {
                id: Some(id(&x.id)),
                boundary: Some(polygon(&x.boundary)),
                overlap_id: ids(&x.overlap_ids),
                r#type: Some(x.signal_type as i32),
                stop_line: x.stop_lines.iter().map(curve_to_pb).collect(),
            })
            .collect(),
        overlap: map.overlaps.iter().map(overlap_to_pb).collect(),
        clear_area: map
            .clear_areas
            .iter()
            .map(|x| pb::ClearArea {
                id: Some(id(&x.id)),
                overlap_id: ids(&x.overlap_ids),
                polygon: Some(polygon(&x.polygon)),
            })
            .collect(),
        speed_bump: map
            .speed_bumps
            .iter()
            .map(|x| pb::SpeedBump {
                id: Some(id(&x.id)),
                overlap_id: ids(&x.overlap_ids),
                position: x.positions.iter().map(curve_to_pb).collect(),
            })
            .collect(),
        road: map
            .roads
            .iter()
            .map(|x| pb::Road {
                id: Some(id(&x.id)),
                section: x
                    .sections
                    .iter()
                    .map(|s| pb::RoadSection {
                        id: Some(id(&s.id)),
                        lane_id: ids(&s.lane_ids),
                    })
                    .collect(),
                junction_id: x.junction_id.as_deref().map(id),
                r#type: Some(x.road_type as i32),
            })
            .collect(),
        parking_space: map
            .parking_spaces
            .iter()
            .map(|x| pb::ParkingSpace {
                id: Some(id(&x.id)),
                polygon: Some(polygon(&x.polygon)),
                overlap_id: ids(&x.overlap_ids),
                heading: x.heading,
            })
            .collect(),
    }
}

pub fn map_from_pb(map: pb::Map) -> ApolloMap {
    ApolloMap {
        header: map.header.map(header_from_pb).unwrap_or_default(),
        crosswalks: map
            .crosswalk
            .into_iter()
            .map(|x| Crosswalk {
                id: id_from(x.id),
                polygon: polygon_from(x.polygon),
                overlap_ids: ids_from(x.overlap_id),
            })
            .collect(),
        junctions: map
            .junction
            .into_iter()
            .map(|x| Junction {
                id: id_from(x.id),
                polygon: polygon_from(x.polygon),
                overlap_ids: ids_from(x.overlap_id),
            })
            .collect(),
        lanes: map.lane.into_iter().map(lane_from_pb).collect(),
        stop_signs: map
            .stop_sign
            .into_iter()
            .map(|x| StopSign {
                id: id_from(x.id),
                stop_lines: x.stop_line.into_iter().map(curve_from_pb).collect(),
                overlap_ids: ids_from(x.overlap_id),
                stop_sign_type: enum_or(x.r#type, StopSignType::OneWay),
            })
            .collect(),
        signals: map
            .signal
            .into_iter()
            .map(|x| Signal {
                id: id_from(x.id),
                boundary: polygon_from(x.boundary),
                overlap_ids: ids_from(x.overlap_id),
                signal_type: enum_or(x.r#type, SignalType::Mix3Vertical),
                stop_lines: x.stop_line.into_iter().map(curve_from_pb).collect(),
            })
            .collect(),
        overlaps: map.overlap.into_iter().map(overlap_from_pb).collect(),
        clear_areas: map
            .clear_area
            .into_iter()
            .map(|x| ClearArea {
                id: id_from(x.id),
                polygon: polygon_from(x.polygon),
                overlap_ids: ids_from(x.overlap_id),
            })
            .collect(),
        speed_bumps: map
            .speed_bump
            .into_iter()
            .map(|x| SpeedBump {
                id: id_from(x.id),
                positions: x.position.into_iter().map(curve_from_pb).collect(),
                overlap_ids: ids_from(x.overlap_id),
            })
            .collect(),
        roads: map
            .road
            .into_iter()
            .map(|x| Road {
                id: id_from(x.id),
                sections: x
                    .section
                    .into_iter()
                    .map(|s| RoadSection {
                        id: id_from(s.id),
                        lane_ids: ids_from(s.lane_id),
                    })
                    .collect(),
                junction_id: optional_id_from(x.junction_id),
                road_type: enum_or(x.r#type, RoadType::CityRoad),
            })
            .collect(),
        parking_spaces: map
            .parking_space
            .into_iter()
            .map(|x| ParkingSpace {
                id: id_from(x.id),
                polygon: polygon_from(x.polygon),
                overlap_ids: ids_from(x.overlap_id),
                heading: x.heading,
            })
            .collect(),
    }
}

pub fn graph_to_pb(graph: &TopoGraph) -> pb_routing::Graph {
    pb_routing::Graph {
        hdmap_version: Some(graph.hdmap_version.clone()),
        hdmap_district: Some(graph.hdmap_district.clone()),
        node: graph
            .nodes
            .iter()
            .map(|n| pb_routing::Node {
                lane_id: Some(n.lane_id.clone()),
                length: Some(n.length),
                left_out: n.left_out.iter().map(range_to_pb).collect(),
                right_out: n.right_out.iter().map(range_to_pb).collect(),
                cost: Some(n.cost),
                central_curve: Some(curve_to_pb(&n.central_curve)),
                is_virtual: Some(n.is_virtual),
                road_id: Some(n.road_id.clone()),
            })
            .collect(),
        edge: graph
            .edges
            .iter()
            .map(|e| pb_routing::Edge {
                from_lane_id: Some(e.from_lane_id.clone()),
                to_lane_id: Some(e.to_lane_id.clone()),
                cost: Some(e.cost),
                direction_type: Some(e.direction as i32),
            })
            .collect(),
    }
}

pub fn graph_from_pb(graph: pb_routing::Graph) -> TopoGraph {
    TopoGraph {
        hdmap_version: graph.hdmap_version.unwrap_or_default(),
        hdmap_district: graph.hdmap_district.unwrap_or_default(),
        nodes: graph
            .node
            .into_iter()
            .map(|n| TopoNode {
                lane_id: n.lane_id.unwrap_or_default(),
                length: n.length.unwrap_or(0.0),
                left_out: n.left_out.into_iter().map(range_from_pb).collect(),
                right_out: n.right_out.into_iter().map(range_from_pb).collect(),
                cost: n.cost.unwrap_or(0.0),
                central_curve: n.central_curve.map(curve_from_pb).unwrap_or_default(),
                is_virtual: n.is_virtual.unwrap_or(true),
                road_id: n.road_id.unwrap_or_default(),
            })
            .collect(),
        edges: graph
            .edge
            .into_iter()
            .map(|e| TopoEdge {
                from_lane_id: e.from_lane_id.unwrap_or_default(),
                to_lane_id: e.to_lane_id.unwrap_or_default(),
                cost: e.cost.unwrap_or(0.0),
                direction: enum_or(e.direction_type, EdgeDirection::Forward),
            })
            .collect(),
    }
}

fn header_to_pb(header: &Header) -> pb::Header {
    pb::Header {
        version: Some(header.version.as_bytes().to_vec()),
        date: Some(header.date.as_bytes().to_vec()),
        projection: Some(pb::Projection {
            proj: Some(header.projection.clone()),
        }),
        district: Some(header.district.as_bytes().to_vec()),
        left: Some(header.left),
        top: Some(header.top),
        right: Some(header.right),
        bottom: Some(header.bottom),
        vendor: Some(header.vendor.as_bytes().to_vec()),
    }
}

fn header_from_pb(header: pb::Header) -> Header {
    let text = |bytes: Option<Vec<u8>>| {
        bytes
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    };
    Header {
        version: text(header.version),
        date: text(header.date),
        projection: header
            .projection
            .and_then(|p| p.proj)
            .unwrap_or_default(),
        district: text(header.district),
        left: header.left.unwrap_or(0.0),
        top: header.top.unwrap_or(0.0),
        right: header.right.unwrap_or(0.0),
        bottom: header.bottom.unwrap_or(0.0),
        vendor: text(header.vendor),
    }
}

fn lane_to_pb(lane: &Lane) -> pb::Lane {
    pb::Lane {
        id: Some(id(&lane.id)),
        central_curve: Some(curve_to_pb(&lane.central_curve)),
        left_boundary: Some(boundary_to_pb(&lane.left_boundary)),
        right_boundary: Some(boundary_to_pb(&lane.right_boundary)),
        length: Some(lane.length),
        speed_limit: Some(lane.speed_limit),
        overlap_id: ids(&lane.overlap_ids),
        predecessor_id: ids(&lane.predecessor_ids),
        successor_id: ids(&lane.successor_ids),
        left_neighbor_forward_lane_id: ids(&lane.left_neighbor_forward_lane_ids),
        right_neighbor_forward_lane_id: ids(&lane.right_neighbor_forward_lane_ids),
        r#type: Some(lane.lane_type as i32),
        turn: Some(lane.turn as i32),
        left_neighbor_reverse_lane_id: ids(&lane.left_neighbor_reverse_lane_ids),
        right_neighbor_reverse_lane_id: ids(&lane.right_neighbor_reverse_lane_ids),
        junction_id: lane.junction_id.as_deref().map(id),
        left_sample: samples(&lane.left_samples),
        right_sample: samples(&lane.right_samples),
        direction: Some(lane.direction as i32),
        left_road_sample: samples(&lane.left_road_samples),
        right_road_sample: samples(&lane.right_road_samples),
        self_reverse_lane_id: ids(&lane.self_reverse_lane_ids),
    }
}

fn lane_from_pb(lane: pb::Lane) -> Lane {
    Lane {
        id: id_from(lane.id),
        central_curve: lane.central_curve.map(curve_from_pb).unwrap_or_default(),
        left_boundary: lane.left_boundary.map(boundary_from_pb).unwrap_or_default(),
        right_boundary: lane.right_boundary.map(boundary_from_pb).unwrap_or_default(),
        length: lane.length.unwrap_or(0.0),
        speed_limit: lane.speed_limit.unwrap_or(DEFAULT_SPEED_LIMIT),
        overlap_ids: ids_from(lane.overlap_id),
        predecessor_ids: ids_from(lane.predecessor_id),
        successor_ids: ids_from(lane.successor_id),
        left_neighbor_forward_lane_ids: ids_from(lane.left_neighbor_forward_lane_id),
        right_neighbor_forward_lane_ids: ids_from(lane.right_neighbor_forward_lane_id),
        left_neighbor_reverse_lane_ids: ids_from(lane.left_neighbor_reverse_lane_id),
        right_neighbor_reverse_lane_ids: ids_from(lane.right_neighbor_reverse_lane_id),
        self_reverse_lane_ids: ids_from(lane.self_reverse_lane_id),
        lane_type: enum_or(lane.r#type, LaneType::CityDriving),
        turn: enum_or(lane.turn, LaneTurn::NoTurn),
        direction: enum_or(lane.direction, LaneDirection::Forward),
        junction_id: optional_id_from(lane.junction_id),
        left_samples: samples_from(lane.left_sample),
        right_samples: samples_from(lane.right_sample),
        left_road_samples: samples_from(lane.left_road_sample),
        right_road_samples: samples_from(lane.right_road_sample),
    }
}

fn boundary_to_pb(boundary: &LaneBoundary) -> pb::LaneBoundary {
    pb::LaneBoundary {
        curve: Some(curve_to_pb(&boundary.curve)),
        length: Some(boundary.length),
        is_virtual: Some(boundary.is_virtual),
        boundary_type: boundary
            .boundary_types
            .iter()
            .map(|bt| pb::LaneBoundaryType {
                s: Some(bt.s),
                types: bt.types.iter().map(|t| *t as i32).collect(),
            })
            .collect(),
    }
}

fn boundary_from_pb(boundary: pb::LaneBoundary) -> LaneBoundary {
    LaneBoundary {
        curve: boundary.curve.map(curve_from_pb).unwrap_or_default(),
        length: boundary.length.unwrap_or(0.0),
        is_virtual: boundary.is_virtual.unwrap_or(false),
        boundary_types: boundary
            .boundary_type
            .into_iter()
            .map(|bt| LaneBoundaryType {
                s: bt.s.unwrap_or(0.0),
                types: bt
                    .types
                    .into_iter()
                    .map(|t| enum_or(Some(t), BoundaryType::Unknown))
                    .collect(),
            })
            .collect(),
    }
}

fn overlap_to_pb(overlap: &Overlap) -> pb::Overlap {
    use pb::object_overlap_info::OverlapInfo as Info;

    pb::Overlap {
        id: Some(id(&overlap.id)),
        object: overlap
            .objects
            .iter()
            .map(|obj| {
                let empty = pb::EmptyOverlapInfo {};
                let info = match obj.info {
                    OverlapInfo::Lane {
                        start_s,
                        end_s,
                        is_merge,
                    } => Info::LaneOverlapInfo(pb::LaneOverlapInfo {
                        start_s: Some(start_s),
                        end_s: Some(end_s),
                        is_merge: Some(is_merge),
                    }),
                    OverlapInfo::Signal => Info::SignalOverlapInfo(empty),
                    OverlapInfo::StopSign => Info::StopSignOverlapInfo(empty),
                    OverlapInfo::Crosswalk => Info::CrosswalkOverlapInfo(empty),
                    OverlapInfo::Junction => Info::JunctionOverlapInfo(empty),
                    OverlapInfo::ClearArea => Info::ClearAreaOverlapInfo(empty),
                    OverlapInfo::SpeedBump => Info::SpeedBumpOverlapInfo(empty),
                    OverlapInfo::ParkingSpace => Info::ParkingSpaceOverlapInfo(empty),
                };
                pb::ObjectOverlapInfo {
                    id: Some(id(&obj.id)),
                    overlap_info: Some(info),
                }
            })
            .collect(),
    }
}

/// Objects with no overlap info, or a kind this crate doesn't model, are dropped.
fn overlap_from_pb(overlap: pb::Overlap) -> Overlap {
    use pb::object_overlap_info::OverlapInfo as Info;

    let overlap_id = id_from(overlap.id);
    let mut objects = Vec::new();
    for obj in overlap.object {
        let info = match obj.overlap_info {
            Some(Info::LaneOverlapInfo(lane)) => OverlapInfo::Lane {
                start_s: lane.start_s.unwrap_or(0.0),
                end_s: lane.end_s.unwrap_or(0.0),
                is_merge: lane.is_merge.unwrap_or(false),
            },
            Some(Info::SignalOverlapInfo(_)) => OverlapInfo::Signal,
            Some(Info::StopSignOverlapInfo(_)) => OverlapInfo::StopSign,
            Some(Info::CrosswalkOverlapInfo(_)) => OverlapInfo::Crosswalk,
            Some(Info::JunctionOverlapInfo(_)) => OverlapInfo::Junction,
            Some(Info::ClearAreaOverlapInfo(_)) => OverlapInfo::ClearArea,
            Some(Info::SpeedBumpOverlapInfo(_)) => OverlapInfo::SpeedBump,
            Some(Info::ParkingSpaceOverlapInfo(_)) => OverlapInfo::ParkingSpace,
            None => {
                debug!("Dropping an object of {} with no usable overlap info", overlap_id);
                continue;
            }
        };
        objects.push(OverlapObject {
            id: id_from(obj.id),
            info,
        });
    }
    Overlap {
        id: overlap_id,
        objects,
    }
}

fn curve_to_pb(curve: &Curve) -> pb::Curve {
    pb::Curve {
        segment: curve
            .segments
            .iter()
            .map(|seg| pb::CurveSegment {
                curve_type: Some(pb::curve_segment::CurveType::LineSegment(pb::LineSegment {
                    point: seg.points.iter().map(point_to_pb).collect(),
                })),
                s: Some(seg.s),
                start_position: Some(point_to_pb(&seg.start_position)),
                heading: Some(seg.heading),
                length: Some(seg.length),
            })
            .collect(),
    }
}

fn curve_from_pb(curve: pb::Curve) -> Curve {
    Curve {
        segments: curve
            .segment
            .into_iter()
            .map(|seg| CurveSegment {
                points: match seg.curve_type {
                    Some(pb::curve_segment::CurveType::LineSegment(line)) => {
                        line.point.iter().map(point_from_pb).collect()
                    }
                    None => Vec::new(),
                },
                s: seg.s.unwrap_or(0.0),
                start_position: seg
                    .start_position
                    .as_ref()
                    .map(point_from_pb)
                    .unwrap_or_default(),
                heading: seg.heading.unwrap_or(0.0),
                length: seg.length.unwrap_or(0.0),
            })
            .collect(),
    }
}

fn range_to_pb(range: &CurveRange) -> pb_routing::CurveRange {
    pb_routing::CurveRange {
        start: Some(pb_routing::CurvePoint {
            s: Some(range.start),
        }),
        end: Some(pb_routing::CurvePoint { s: Some(range.end) }),
    }
}

fn range_from_pb(range: pb_routing::CurveRange) -> CurveRange {
    CurveRange {
        start: range.start.and_then(|p| p.s).unwrap_or(0.0),
        end: range.end.and_then(|p| p.s).unwrap_or(0.0),
    }
}

fn point_to_pb(pt: &PointENU) -> pb::PointEnu {
    pb::PointEnu {
        x: Some(pt.x),
        y: Some(pt.y),
        z: Some(pt.z),
    }
}

fn point_from_pb(pt: &pb::PointEnu) -> PointENU {
    PointENU {
        x: pt.x.unwrap_or(0.0),
        y: pt.y.unwrap_or(0.0),
        z: pt.z.unwrap_or(0.0),
    }
}

fn polygon(pts: &[PointENU]) -> pb::Polygon {
    pb::Polygon {
        point: pts.iter().map(point_to_pb).collect(),
    }
}

fn polygon_from(polygon: Option<pb::Polygon>) -> Vec<PointENU> {
    polygon
        .map(|p| p.point.iter().map(point_from_pb).collect())
        .unwrap_or_default()
}

fn samples(samples: &[LaneSampleAssociation]) -> Vec<pb::LaneSampleAssociation> {
    samples
        .iter()
        .map(|s| pb::LaneSampleAssociation {
            s: Some(s.s),
            width: Some(s.width),
        })
        .collect()
}

fn samples_from(samples: Vec<pb::LaneSampleAssociation>) -> Vec<LaneSampleAssociation> {
    samples
        .into_iter()
        .map(|s| LaneSampleAssociation {
            s: s.s.unwrap_or(0.0),
            width: s.width.unwrap_or(0.0),
        })
        .collect()
}

fn id(id: &str) -> pb::Id {
    pb::Id {
        id: Some(id.to_string()),
    }
}

fn ids(ids: &[String]) -> Vec<pb::Id> {
    ids.iter().map(|x| id(x)).collect()
}

fn id_from(id: Option<pb::Id>) -> String {
    id.and_then(|x| x.id).unwrap_or_default()
}

/// Absent and empty ids both mean "no reference".
fn optional_id_from(id: Option<pb::Id>) -> Option<String> {
    Some(id_from(id)).filter(|x| !x.is_empty())
}

fn ids_from(ids: Vec<pb::Id>) -> Vec<String> {
    ids.into_iter().map(|x| id_from(Some(x))).collect()
}

fn enum_or<E: TryFrom<i32>>(value: Option<i32>, default: E) -> E {
    value
        .and_then(|v| E::try_from(v).ok())
        .unwrap_or(default)
}
