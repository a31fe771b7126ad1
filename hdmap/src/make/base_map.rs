use std::collections::BTreeSet;

use anyhow::Result;
use geojson::Feature;
use serde::{Deserialize, Serialize};

use geom::{GPSBounds, LonLat, PolyLine, Projection};
use hdutil::{MultiMap, Timer};

use crate::features::{line_string, point, polygon_ring, tool_meta};
use crate::lane_geometry::{compute_boundaries, compute_lane_samples, compute_start_heading};
use crate::overlap::find_overlaps;
use crate::tool_meta::encode_tool_meta;
use crate::{
    ApolloMap, BoundaryType, ClearArea, Crosswalk, Curve, CurveSegment, EditorMap, Header,
    Junction, Lane, LaneBoundary, LaneBoundaryType, LaneFeature, ParkingSpace, PointENU,
    ProjectConfig, Road, RoadDefinition, RoadSection, RoadType, Signal, SpeedBump, StopSign,
    VENDOR,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Hide each feature's drawing-tool metadata in its ENU coordinates, so importing the map
    /// later recovers how it was drawn.
    #[serde(default = "default_true")]
    pub embed_tool_meta: bool,
}

impl Default for BuildOptions {
    fn default() -> BuildOptions {
        BuildOptions {
            embed_tool_meta: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A lane that couldn't be built and was left out of the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneProblem {
    pub lane_id: String,
    pub reason: String,
}

pub struct BaseMapBuild {
    pub map: ApolloMap,
    pub problems: Vec<LaneProblem>,
}

pub fn build_base_map(
    proj: &Projection,
    project: &ProjectConfig,
    input: &EditorMap,
    opts: &BuildOptions,
    timer: &mut Timer,
) -> Result<BaseMapBuild> {
    timer.start("find overlaps");
    let overlaps = find_overlaps(proj, input)?;
    // Keyed by (kind, id), since ids only have to be unique within a kind
    let mut overlaps_per_element: MultiMap<(&'static str, String), String> = MultiMap::new();
    for overlap in &overlaps {
        for obj in &overlap.objects {
            overlaps_per_element.insert((obj.info.kind(), obj.id.clone()), overlap.id.clone());
        }
    }
    let overlap_ids =
        |kind: &'static str, id: &str| overlaps_per_element.get(&(kind, id.to_string())).to_vec();
    timer.note(format!("{} overlaps", overlaps.len()));
    timer.stop("find overlaps");

    let shapes = ShapeBuilder { proj, opts };
    let mut map = ApolloMap::default();
    let mut problems = Vec::new();
    let mut bounds = GPSBounds::new();

    timer.start("build lanes");
    for lane in &input.lanes {
        let center = line_string(&lane.center_line)?;
        for pt in &center {
            bounds.update(*pt);
        }
        match build_lane(&shapes, lane, &center, overlap_ids("lane", &lane.id)) {
            Ok(l) => map.lanes.push(l),
            Err(err) => {
                timer.warn(format!("Skipping lane {}: {}", lane.id, err));
                problems.push(LaneProblem {
                    lane_id: lane.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    timer.stop("build lanes");

    let built_lanes: BTreeSet<&str> = map.lanes.iter().map(|l| l.id.as_str()).collect();
    map.roads = build_roads(&input.lanes, &built_lanes, &input.roads);

    timer.start("build other elements");
    for j in &input.junctions {
        map.junctions.push(Junction {
            id: j.id.clone(),
            polygon: shapes.polygon(&j.id, &j.polygon)?,
            overlap_ids: overlap_ids("junction", &j.id),
        });
    }
    for s in &input.signals {
        map.signals.push(Signal {
            id: s.id.clone(),
            boundary: vec![PointENU::from(proj.to_enu(point(&s.position)?))],
            overlap_ids: overlap_ids("signal", &s.id),
            signal_type: s.signal_type,
            stop_lines: vec![shapes.curve(&s.id, &s.stop_line)?],
        });
    }
    for ss in &input.stop_signs {
        map.stop_signs.push(StopSign {
            id: ss.id.clone(),
            stop_lines: vec![shapes.curve(&ss.id, &ss.stop_line)?],
            overlap_ids: overlap_ids("stop_sign", &ss.id),
            stop_sign_type: ss.stop_sign_type,
        });
    }
    for cw in &input.crosswalks {
        map.crosswalks.push(Crosswalk {
            id: cw.id.clone(),
            polygon: shapes.polygon(&cw.id, &cw.polygon)?,
            overlap_ids: overlap_ids("crosswalk", &cw.id),
        });
    }
    for ca in &input.clear_areas {
        map.clear_areas.push(ClearArea {
            id: ca.id.clone(),
            polygon: shapes.polygon(&ca.id, &ca.polygon)?,
            overlap_ids: overlap_ids("clear_area", &ca.id),
        });
    }
    for sb in &input.speed_bumps {
        map.speed_bumps.push(SpeedBump {
            id: sb.id.clone(),
            positions: vec![shapes.curve(&sb.id, &sb.line)?],
            overlap_ids: overlap_ids("speed_bump", &sb.id),
        });
    }
    for ps in &input.parking_spaces {
        map.parking_spaces.push(ParkingSpace {
            id: ps.id.clone(),
            polygon: shapes.polygon(&ps.id, &ps.polygon)?,
            overlap_ids: overlap_ids("parking_space", &ps.id),
            heading: ps.heading,
        });
    }
    timer.stop("build other elements");

    map.overlaps = overlaps;
    map.header = make_header(proj, project, &bounds);
    info!("Built base map: {}", map.describe());
    Ok(BaseMapBuild { map, problems })
}

fn build_lane(
    shapes: &ShapeBuilder,
    lane: &LaneFeature,
    center: &[LonLat],
    overlap_ids: Vec<String>,
) -> Result<Lane> {
    let enu = shapes.proj.to_enu_pts(center);
    let length = PolyLine::new(enu.clone())?.length();
    let heading = compute_start_heading(center);
    let (left, right) = compute_boundaries(shapes.proj, center, lane.width)?;
    let (left_samples, right_samples) = compute_lane_samples(length, lane.width);

    let central_points = shapes.embed(
        &lane.id,
        enu.into_iter().map(PointENU::from).collect(),
        &lane.center_line,
    );

    Ok(Lane {
        id: lane.id.clone(),
        central_curve: make_curve(central_points, heading),
        left_boundary: shapes.boundary(&left, lane.left_boundary_type),
        right_boundary: shapes.boundary(&right, lane.right_boundary_type),
        length: length.inner_meters(),
        speed_limit: lane.speed_limit,
        overlap_ids,
        predecessor_ids: lane.predecessor_ids.clone(),
        successor_ids: lane.successor_ids.clone(),
        left_neighbor_forward_lane_ids: lane.left_neighbor_ids.clone(),
        right_neighbor_forward_lane_ids: lane.right_neighbor_ids.clone(),
        left_neighbor_reverse_lane_ids: Vec::new(),
        right_neighbor_reverse_lane_ids: Vec::new(),
        self_reverse_lane_ids: Vec::new(),
        lane_type: lane.lane_type,
        turn: lane.turn,
        direction: lane.direction,
        junction_id: lane.junction_id.clone(),
        left_road_samples: left_samples.clone(),
        right_road_samples: right_samples.clone(),
        left_samples,
        right_samples,
    })
}

/// Lanes assigned to a known road share that road's single section. Every other lane gets a
/// road of its own.
fn build_roads(
    lanes: &[LaneFeature],
    built_lanes: &BTreeSet<&str>,
    definitions: &[RoadDefinition],
) -> Vec<Road> {
    let mut grouped: MultiMap<&str, &LaneFeature> = MultiMap::new();
    let mut lone_lanes = Vec::new();
    for lane in lanes {
        if !built_lanes.contains(lane.id.as_str()) {
            continue;
        }
        match lane
            .road_id
            .as_deref()
            .filter(|id| definitions.iter().any(|def| def.id == *id))
        {
            Some(road_id) => grouped.insert(road_id, lane),
            None => lone_lanes.push(lane),
        }
    }

    let mut roads = Vec::new();
    for (road_id, members) in grouped.consume() {
        let road_type = definitions
            .iter()
            .find(|def| def.id == road_id)
            .map(|def| def.road_type)
            .unwrap_or(RoadType::CityRoad);
        let junctions: BTreeSet<&str> = members
            .iter()
            .filter_map(|l| l.junction_id.as_deref())
            .collect();
        let junction_id = if junctions.len() == 1 {
            junctions.into_iter().next().map(|j| j.to_string())
        } else {
            None
        };
        roads.push(Road {
            id: road_id.to_string(),
            sections: vec![RoadSection {
                id: format!("{}_section_0", road_id),
                lane_ids: members.iter().map(|l| l.id.clone()).collect(),
            }],
            junction_id,
            road_type,
        });
    }
    for lane in lone_lanes {
        let road_id = format!("road_{}", lane.id);
        roads.push(Road {
            sections: vec![RoadSection {
                id: format!("{}_section_0", road_id),
                lane_ids: vec![lane.id.clone()],
            }],
            id: road_id,
            junction_id: lane.junction_id.clone(),
            road_type: RoadType::CityRoad,
        });
    }
    roads
}

fn make_header(proj: &Projection, project: &ProjectConfig, bounds: &GPSBounds) -> Header {
    let (left, top, right, bottom) = if bounds.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (bounds.min_lon, bounds.max_lat, bounds.max_lon, bounds.min_lat)
    };
    Header {
        version: project.version.clone(),
        date: project.date.clone(),
        projection: proj.proj_string(),
        district: project.name.clone(),
        left,
        top,
        right,
        bottom,
        vendor: VENDOR.to_string(),
    }
}

/// A single line segment through every point. Fewer than 2 points make an empty curve.
pub(crate) fn make_curve(points: Vec<PointENU>, heading: f64) -> Curve {
    if points.len() < 2 {
        return Curve::default();
    }
    let length = enu_length(&points);
    Curve {
        segments: vec![CurveSegment {
            s: 0.0,
            start_position: points[0],
            heading,
            length,
            points,
        }],
    }
}

fn enu_length(points: &[PointENU]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].to_pt2d().raw_dist_to(pair[1].to_pt2d()))
        .sum()
}

/// Converts feature geometry into ENU shapes, hiding tool metadata in them when asked to.
struct ShapeBuilder<'a> {
    proj: &'a Projection,
    opts: &'a BuildOptions,
}

impl<'a> ShapeBuilder<'a> {
    fn enu(&self, pts: &[LonLat]) -> Vec<PointENU> {
        pts.iter()
            .map(|pt| PointENU::from(self.proj.to_enu(*pt)))
            .collect()
    }

    fn curve(&self, id: &str, feature: &Feature) -> Result<Curve> {
        let pts = line_string(feature)?;
        let heading = compute_start_heading(&pts);
        let enu = self.enu(&pts);
        Ok(make_curve(self.embed(id, enu, feature), heading))
    }

    /// The ring without its closing point.
    fn polygon(&self, id: &str, feature: &Feature) -> Result<Vec<PointENU>> {
        let mut pts = polygon_ring(feature)?;
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        let enu = self.enu(&pts);
        Ok(self.embed(id, enu, feature))
    }

    fn boundary(&self, pts: &[LonLat], boundary_type: BoundaryType) -> LaneBoundary {
        let curve = make_curve(self.enu(pts), 0.0);
        LaneBoundary {
            length: curve.segments.iter().map(|seg| seg.length).sum(),
            curve,
            is_virtual: false,
            boundary_types: vec![LaneBoundaryType {
                s: 0.0,
                types: vec![boundary_type],
            }],
        }
    }

    /// Measurements must already be taken; this nudges coordinates by up to 0.1mm.
    fn embed(&self, id: &str, pts: Vec<PointENU>, feature: &Feature) -> Vec<PointENU> {
        if !self.opts.embed_tool_meta {
            return pts;
        }
        let meta = match tool_meta(feature) {
            Some(meta) => meta,
            None => return pts,
        };
        match encode_tool_meta(&pts, &meta) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("Not embedding tool metadata in {}: {}", id, err);
                pts
            }
        }
    }
}
