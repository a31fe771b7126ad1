//! Reading a `base_map` back into editable elements. Drawing-tool metadata is recovered from the
//! coordinates when it's there, and guessed from the shape when it isn't.

use std::collections::BTreeMap;

use anyhow::Result;
use geojson::Feature;

use geom::{parse_origin, LonLat, Projection};

use crate::elements::DEFAULT_LANE_WIDTH;
use crate::features::{line_feature, point_feature, polygon_feature};
use crate::proto::MapCodec;
use crate::tool_meta::detect::{detect_tool, GeometryKind};
use crate::tool_meta::decode_tool_meta;
use crate::{
    to_pt2ds, BoundaryType, ClearAreaFeature, CrosswalkFeature, Curve, EditorMap, JunctionFeature,
    Lane, LaneBoundary, LaneFeature, ParkingSpaceFeature, PointENU, ProjectConfig,
    RoadDefinition, SignalFeature, SpeedBumpFeature, StopSignFeature,
};

pub struct ParsedMap {
    pub project: ProjectConfig,
    pub map: EditorMap,
}

pub fn parse_base_map(codec: &dyn MapCodec, bytes: &[u8]) -> Result<ParsedMap> {
    let apollo = codec.decode_map(bytes)?;
    let header = &apollo.header;

    let (origin_lat, origin_lon) = match parse_origin(&header.projection) {
        Some(origin) => origin,
        None => {
            warn!(
                "No origin in projection \"{}\", using (0, 0)",
                header.projection
            );
            (0.0, 0.0)
        }
    };
    let proj = Projection::new(origin_lat, origin_lon)?;
    let project = ProjectConfig {
        name: non_empty(&header.district, "Imported Map"),
        origin_lat,
        origin_lon,
        version: non_empty(&header.version, "1.0.0"),
        date: header.date.clone(),
    };

    let mut road_per_lane: BTreeMap<&str, &str> = BTreeMap::new();
    let mut map = EditorMap::new();
    for road in &apollo.roads {
        for section in &road.sections {
            for lane in &section.lane_ids {
                road_per_lane.insert(lane, &road.id);
            }
        }
        map.roads.push(RoadDefinition {
            id: road.id.clone(),
            name: road.id.clone(),
            road_type: road.road_type,
        });
    }

    for lane in &apollo.lanes {
        let mut feature = import_lane(&proj, lane);
        feature.road_id = road_per_lane.get(lane.id.as_str()).map(|r| r.to_string());
        map.lanes.push(feature);
    }
    for j in &apollo.junctions {
        map.junctions.push(JunctionFeature {
            id: j.id.clone(),
            polygon: polygon(&proj, &j.polygon),
        });
    }
    for s in &apollo.signals {
        let (stop_line_pts, stop_line) = line(&proj, s.stop_lines.first());
        let position = s
            .boundary
            .first()
            .map(|pt| proj.to_lon_lat(pt.to_pt2d()))
            .or_else(|| stop_line_pts.get(stop_line_pts.len() / 2).copied())
            .unwrap_or_else(|| proj.origin());
        map.signals.push(SignalFeature {
            id: s.id.clone(),
            position: point_feature(position),
            stop_line,
            signal_type: s.signal_type,
        });
    }
    for ss in &apollo.stop_signs {
        map.stop_signs.push(StopSignFeature {
            id: ss.id.clone(),
            stop_line: line(&proj, ss.stop_lines.first()).1,
            stop_sign_type: ss.stop_sign_type,
        });
    }
    for cw in &apollo.crosswalks {
        map.crosswalks.push(CrosswalkFeature {
            id: cw.id.clone(),
            polygon: polygon(&proj, &cw.polygon),
        });
    }
    for ca in &apollo.clear_areas {
        map.clear_areas.push(ClearAreaFeature {
            id: ca.id.clone(),
            polygon: polygon(&proj, &ca.polygon),
        });
    }
    for sb in &apollo.speed_bumps {
        map.speed_bumps.push(SpeedBumpFeature {
            id: sb.id.clone(),
            line: line(&proj, sb.positions.first()).1,
        });
    }
    for ps in &apollo.parking_spaces {
        map.parking_spaces.push(ParkingSpaceFeature {
            id: ps.id.clone(),
            polygon: polygon(&proj, &ps.polygon),
            heading: ps.heading,
        });
    }

    info!("Imported {}: {}", project.name, map.describe());
    Ok(ParsedMap { project, map })
}

fn import_lane(proj: &Projection, lane: &Lane) -> LaneFeature {
    let (_, center_line) = line(proj, Some(&lane.central_curve));

    let width = if lane.left_samples.is_empty() {
        DEFAULT_LANE_WIDTH
    } else {
        let total: f64 = lane
            .left_samples
            .iter()
            .enumerate()
            .map(|(idx, left)| {
                left.width
                    + lane
                        .right_samples
                        .get(idx)
                        .map(|right| right.width)
                        .unwrap_or(left.width)
            })
            .sum();
        total / lane.left_samples.len() as f64
    };

    LaneFeature {
        id: lane.id.clone(),
        center_line,
        width,
        speed_limit: lane.speed_limit,
        lane_type: lane.lane_type,
        turn: lane.turn,
        direction: lane.direction,
        left_boundary_type: boundary_type(&lane.left_boundary),
        right_boundary_type: boundary_type(&lane.right_boundary),
        predecessor_ids: lane.predecessor_ids.clone(),
        successor_ids: lane.successor_ids.clone(),
        left_neighbor_ids: lane.left_neighbor_forward_lane_ids.clone(),
        right_neighbor_ids: lane.right_neighbor_forward_lane_ids.clone(),
        junction_id: lane.junction_id.clone(),
        road_id: None,
    }
}

/// Boundaries without any listed type are treated as solid.
fn boundary_type(boundary: &LaneBoundary) -> BoundaryType {
    boundary
        .boundary_types
        .first()
        .and_then(|bt| bt.types.first().copied())
        .unwrap_or(BoundaryType::SolidWhite)
}

/// A missing curve becomes an empty line.
fn line(proj: &Projection, curve: Option<&Curve>) -> (Vec<LonLat>, Feature) {
    let pts = curve.map(|c| c.points()).unwrap_or_default();
    let (meta, gps) = recover(proj, &pts, GeometryKind::LineString);
    let feature = line_feature(&gps, Some(&meta));
    (gps, feature)
}

fn polygon(proj: &Projection, pts: &[PointENU]) -> Feature {
    let (meta, gps) = recover(proj, pts, GeometryKind::Polygon);
    polygon_feature(&gps, Some(&meta))
}

/// Encoded metadata wins. Otherwise the shape is guessed from the points, which are used as-is.
fn recover(
    proj: &Projection,
    pts: &[PointENU],
    kind: GeometryKind,
) -> (crate::ToolMeta, Vec<LonLat>) {
    if let Some(decoded) = decode_tool_meta(pts) {
        return (
            decoded.meta,
            proj.to_lon_lat_pts(&to_pt2ds(&decoded.clean_points)),
        );
    }
    let enu = to_pt2ds(pts);
    (detect_tool(kind, &enu), proj.to_lon_lat_pts(&enu))
}

fn non_empty(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{line_string, point, polygon_ring, tool_meta};
    use crate::proto::ProtobufCodec;
    use crate::{
        ApolloMap, CurveSegment, Header, Junction, LaneSampleAssociation, Road, RoadSection,
        RoadType, Signal, SignalType, ToolMeta,
    };

    fn enu(pts: &[(f64, f64)]) -> Vec<PointENU> {
        pts.iter().map(|(x, y)| PointENU::new(*x, *y)).collect()
    }

    fn curve(pts: &[(f64, f64)]) -> Curve {
        Curve {
            segments: vec![CurveSegment {
                points: enu(pts),
                ..Default::default()
            }],
        }
    }

    fn import(map: &ApolloMap) -> ParsedMap {
        let codec = ProtobufCodec;
        parse_base_map(&codec, &codec.encode_map(map).unwrap()).unwrap()
    }

    fn header() -> Header {
        Header {
            projection: "+proj=tmerc +lat_0=37.4153 +lon_0=-122.0119 +k=1 +ellps=WGS84 +no_defs"
                .to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn project_defaults() {
        let parsed = import(&ApolloMap::default());
        assert_eq!(parsed.project.name, "Imported Map");
        assert_eq!(parsed.project.version, "1.0.0");
        assert_eq!((parsed.project.origin_lat, parsed.project.origin_lon), (0.0, 0.0));
        assert_eq!(parsed.map.num_elements(), 0);

        let parsed = import(&ApolloMap {
            header: Header {
                district: "Sunnyvale".to_string(),
                version: "3".to_string(),
                date: "2024-01-01".to_string(),
                ..header()
            },
            ..Default::default()
        });
        assert_eq!(parsed.project.name, "Sunnyvale");
        assert_eq!(parsed.project.version, "3");
        assert_eq!(parsed.project.date, "2024-01-01");
        assert_eq!(parsed.project.origin_lat, 37.4153);
        assert_eq!(parsed.project.origin_lon, -122.0119);
    }

    #[test]
    fn guessed_tools() {
        let mut map = ApolloMap {
            header: header(),
            ..Default::default()
        };
        map.junctions.push(Junction {
            id: "rect".to_string(),
            polygon: enu(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]),
            overlap_ids: Vec::new(),
        });
        map.junctions.push(Junction {
            id: "blob".to_string(),
            polygon: enu(&[(0.0, 0.0), (10.0, 0.0), (12.0, 7.0), (0.0, 5.0)]),
            overlap_ids: Vec::new(),
        });
        let parsed = import(&map);

        match tool_meta(&parsed.map.junctions[0].polygon) {
            Some(ToolMeta::RotatableRect {
                rotation,
                width,
                height,
            }) => {
                assert!(rotation.abs() < 1e-6);
                assert!((width - 10.0).abs() < 1e-6);
                assert!((height - 5.0).abs() < 1e-6);
            }
            other => panic!("expected a rect, got {:?}", other),
        }
        assert_eq!(
            tool_meta(&parsed.map.junctions[1].polygon),
            Some(ToolMeta::Polygon)
        );
        // Rings come back closed
        let ring = polygon_ring(&parsed.map.junctions[0].polygon).unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn lanes_and_roads() {
        let mut map = ApolloMap {
            header: header(),
            ..Default::default()
        };
        let sample = |width| LaneSampleAssociation { s: 0.0, width };
        map.lanes.push(Lane {
            id: "l".to_string(),
            central_curve: curve(&[(0.0, 0.0), (0.0, 20.0)]),
            left_boundary: LaneBoundary::default(),
            right_boundary: LaneBoundary::default(),
            length: 20.0,
            speed_limit: 10.0,
            overlap_ids: Vec::new(),
            predecessor_ids: vec!["p".to_string()],
            successor_ids: Vec::new(),
            left_neighbor_forward_lane_ids: Vec::new(),
            right_neighbor_forward_lane_ids: Vec::new(),
            left_neighbor_reverse_lane_ids: Vec::new(),
            right_neighbor_reverse_lane_ids: Vec::new(),
            self_reverse_lane_ids: Vec::new(),
            lane_type: crate::LaneType::Biking,
            turn: crate::LaneTurn::RightTurn,
            direction: crate::LaneDirection::Forward,
            junction_id: None,
            left_samples: vec![sample(1.0), sample(2.0)],
            right_samples: vec![sample(1.0)],
            left_road_samples: Vec::new(),
            right_road_samples: Vec::new(),
        });
        map.roads.push(Road {
            id: "r1".to_string(),
            sections: vec![RoadSection {
                id: "r1_section_0".to_string(),
                lane_ids: vec!["l".to_string()],
            }],
            junction_id: None,
            road_type: RoadType::Park,
        });

        let parsed = import(&map);
        let lane = &parsed.map.lanes[0];
        // (1 + 1) and (2 + 2), averaged
        assert_eq!(lane.width, 3.0);
        assert_eq!(lane.speed_limit, 10.0);
        assert_eq!(lane.lane_type, crate::LaneType::Biking);
        assert_eq!(lane.left_boundary_type, BoundaryType::SolidWhite);
        assert_eq!(lane.road_id.as_deref(), Some("r1"));
        assert_eq!(lane.predecessor_ids, vec!["p"]);
        assert_eq!(tool_meta(&lane.center_line), Some(ToolMeta::Line));
        assert_eq!(line_string(&lane.center_line).unwrap().len(), 2);

        assert_eq!(parsed.map.roads.len(), 1);
        assert_eq!(parsed.map.roads[0].name, "r1");
        assert_eq!(parsed.map.roads[0].road_type, RoadType::Park);
    }

    #[test]
    fn signal_positions() {
        let proj = Projection::new(37.4153, -122.0119).unwrap();
        let mut map = ApolloMap {
            header: header(),
            ..Default::default()
        };
        let signal = |id: &str, boundary: Vec<PointENU>, stop_lines: Vec<Curve>| Signal {
            id: id.to_string(),
            boundary,
            overlap_ids: Vec::new(),
            signal_type: SignalType::Single,
            stop_lines,
        };
        map.signals.push(signal(
            "with_boundary",
            enu(&[(5.0, 5.0)]),
            vec![curve(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])],
        ));
        map.signals.push(signal(
            "stop_line_only",
            Vec::new(),
            vec![curve(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])],
        ));
        map.signals.push(signal("nothing", Vec::new(), Vec::new()));
        let parsed = import(&map);

        let position = |idx: usize| proj.to_enu(point(&parsed.map.signals[idx].position).unwrap());
        assert!(position(0).approx_eq(geom::Pt2D::new(5.0, 5.0), geom::Distance::meters(1e-6)));
        assert!(position(1).approx_eq(geom::Pt2D::new(1.0, 0.0), geom::Distance::meters(1e-6)));
        assert!(position(2).approx_eq(geom::Pt2D::new(0.0, 0.0), geom::Distance::meters(1e-6)));
        assert_eq!(parsed.map.signals[0].signal_type, SignalType::Single);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_base_map(&ProtobufCodec, &[0xff, 0xff, 0xff]).is_err());
    }
}
