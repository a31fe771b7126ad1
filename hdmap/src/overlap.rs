//! Finding where lanes cross other map objects. Everything is measured in ENU meters along the
//! lane centerline.

use anyhow::Result;

use geom::{Distance, Line, PolyLine, Projection, Ring};

use crate::features::{line_string, polygon_ring};
use crate::{EditorMap, LaneFeature, Overlap, OverlapInfo, OverlapObject};

/// Stop lines and speed bumps occupy this much of the lane on either side of the crossing.
const LINE_OVERLAP_HALF_WIDTH: Distance = Distance::const_meters(0.5);

/// Hands out `overlap_1`, `overlap_2`, ... Each build makes its own.
struct IdAllocator {
    next: usize,
}

impl IdAllocator {
    fn new() -> IdAllocator {
        IdAllocator { next: 1 }
    }

    fn next(&mut self) -> String {
        let id = format!("overlap_{}", self.next);
        self.next += 1;
        id
    }
}

/// Lanes whose centerline can't form a line are skipped; building the lane itself reports
/// them. Geometry of the wrong kind is an error.
pub fn find_overlaps(proj: &Projection, map: &EditorMap) -> Result<Vec<Overlap>> {
    let lanes = lane_polylines(proj, &map.lanes)?;
    let mut ids = IdAllocator::new();
    let mut overlaps = Vec::new();

    // Crosswalks, signals, stop signs, junctions, clear areas, then speed bumps
    let crosswalks = rings(proj, map.crosswalks.iter().map(|x| (&x.id, &x.polygon)))?;
    for (lane, pl) in &lanes {
        for (id, ring) in &crosswalks {
            if let Some((start_s, end_s)) = polygon_overlap(pl, ring) {
                overlaps.push(make(&mut ids, lane, start_s, end_s, id, OverlapInfo::Crosswalk));
            }
        }
    }

    let signals = lines(proj, map.signals.iter().map(|x| (&x.id, &x.stop_line)))?;
    for (lane, pl) in &lanes {
        for (id, stop_line) in &signals {
            if let Some((start_s, end_s)) = line_overlap(pl, stop_line) {
                overlaps.push(make(&mut ids, lane, start_s, end_s, id, OverlapInfo::Signal));
            }
        }
    }

    let stop_signs = lines(proj, map.stop_signs.iter().map(|x| (&x.id, &x.stop_line)))?;
    for (lane, pl) in &lanes {
        for (id, stop_line) in &stop_signs {
            if let Some((start_s, end_s)) = line_overlap(pl, stop_line) {
                overlaps.push(make(&mut ids, lane, start_s, end_s, id, OverlapInfo::StopSign));
            }
        }
    }

    let junctions = rings(proj, map.junctions.iter().map(|x| (&x.id, &x.polygon)))?;
    for (lane, pl) in &lanes {
        for (id, ring) in &junctions {
            if in_junction(pl, ring) {
                overlaps.push(make(
                    &mut ids,
                    lane,
                    Distance::ZERO,
                    pl.length(),
                    id,
                    OverlapInfo::Junction,
                ));
            }
        }
    }

    let clear_areas = rings(proj, map.clear_areas.iter().map(|x| (&x.id, &x.polygon)))?;
    for (lane, pl) in &lanes {
        for (id, ring) in &clear_areas {
            if let Some((start_s, end_s)) = polygon_overlap(pl, ring) {
                overlaps.push(make(&mut ids, lane, start_s, end_s, id, OverlapInfo::ClearArea));
            }
        }
    }

    let speed_bumps = lines(proj, map.speed_bumps.iter().map(|x| (&x.id, &x.line)))?;
    for (lane, pl) in &lanes {
        for (id, line) in &speed_bumps {
            if let Some((start_s, end_s)) = line_overlap(pl, line) {
                overlaps.push(make(&mut ids, lane, start_s, end_s, id, OverlapInfo::SpeedBump));
            }
        }
    }

    Ok(overlaps)
}

/// The range of the lane between the first and last place it crosses the polygon's boundary. A
/// lane entirely inside without crossing doesn't count.
fn polygon_overlap(lane: &PolyLine, ring: &Ring) -> Option<(Distance, Distance)> {
    let hits = lane.intersection_pts(&ring.lines());
    let mut dists: Vec<Distance> = hits
        .into_iter()
        .map(|pt| lane.dist_along_of_closest_pt(pt).0)
        .collect();
    dists.sort();
    Some((*dists.first()?, *dists.last()?))
}

/// A fixed window around the first crossing.
fn line_overlap(lane: &PolyLine, line: &[Line]) -> Option<(Distance, Distance)> {
    let hit = *lane.intersection_pts(line).first()?;
    let s = lane.dist_along_of_closest_pt(hit).0;
    let len = lane.length();
    Some((
        (s - LINE_OVERLAP_HALF_WIDTH).clamp_to(Distance::ZERO, len),
        (s + LINE_OVERLAP_HALF_WIDTH).clamp_to(Distance::ZERO, len),
    ))
}

/// Only the lane's middle vertex is checked.
fn in_junction(lane: &PolyLine, ring: &Ring) -> bool {
    let pts = lane.points();
    ring.contains_pt(pts[pts.len() / 2])
}

fn make(
    ids: &mut IdAllocator,
    lane_id: &str,
    start_s: Distance,
    end_s: Distance,
    other_id: &str,
    other: OverlapInfo,
) -> Overlap {
    Overlap {
        id: ids.next(),
        objects: vec![
            OverlapObject {
                id: lane_id.to_string(),
                info: OverlapInfo::Lane {
                    start_s: start_s.inner_meters(),
                    end_s: end_s.inner_meters(),
                    is_merge: false,
                },
            },
            OverlapObject {
                id: other_id.to_string(),
                info: other,
            },
        ],
    }
}

fn lane_polylines<'a>(
    proj: &Projection,
    lanes: &'a [LaneFeature],
) -> Result<Vec<(&'a str, PolyLine)>> {
    let mut result = Vec::new();
    for lane in lanes {
        let pts = line_string(&lane.center_line)?;
        match PolyLine::new(proj.to_enu_pts(&pts)) {
            Ok(pl) => result.push((lane.id.as_str(), pl)),
            Err(err) => debug!("No overlaps for {}: {}", lane.id, err),
        }
    }
    Ok(result)
}

fn rings<'a, I: Iterator<Item = (&'a String, &'a geojson::Feature)>>(
    proj: &Projection,
    features: I,
) -> Result<Vec<(&'a str, Ring)>> {
    let mut result = Vec::new();
    for (id, feature) in features {
        let pts = polygon_ring(feature)?;
        match Ring::closing(proj.to_enu_pts(&pts)) {
            Ok(ring) => result.push((id.as_str(), ring)),
            Err(err) => warn!("Skipping overlaps with {}: {}", id, err),
        }
    }
    Ok(result)
}

fn lines<'a, I: Iterator<Item = (&'a String, &'a geojson::Feature)>>(
    proj: &Projection,
    features: I,
) -> Result<Vec<(&'a str, Vec<Line>)>> {
    let mut result = Vec::new();
    for (id, feature) in features {
        let pts = proj.to_enu_pts(&line_string(feature)?);
        if pts.len() < 2 {
            warn!("Skipping overlaps with {}: it has {} points", id, pts.len());
            continue;
        }
        result.push((
            id.as_str(),
            pts.windows(2).map(|pair| Line::new(pair[0], pair[1])).collect(),
        ));
    }
    Ok(result)
}
