//! Measuring a lane from its centerline: boundaries, width samples, heading, and the shapes the
//! editor draws.

use anyhow::{bail, Result};

use geom::{gps_length, Angle, Distance, LonLat, PolyLine, Projection};

use crate::LaneSampleAssociation;

/// Lane ends closer than this snap together when connecting lanes.
pub const SNAP_THRESHOLD: Distance = Distance::const_meters(5.0);

/// Offsets the centerline `width / 2` to the left and right. The offset happens in the metric
/// ENU frame, so the distance is true meters at any latitude. Returns (left, right).
pub fn compute_boundaries(
    proj: &Projection,
    center_line: &[LonLat],
    width: f64,
) -> Result<(Vec<LonLat>, Vec<LonLat>)> {
    if !(width > 0.0) {
        bail!("Lane width {} must be positive", width);
    }
    let pl = PolyLine::deduping_new(proj.to_enu_pts(center_line))?;
    let half_width = Distance::meters(width / 2.0);
    let left = pl.shift_left(half_width)?;
    let right = pl.shift_right(half_width)?;
    Ok((
        proj.to_lon_lat_pts(left.points()),
        proj.to_lon_lat_pts(right.points()),
    ))
}

/// A `{s, width / 2}` pair every meter along the lane, plus the exact end if the length isn't a
/// whole number of meters. The same samples apply to both sides.
pub fn compute_lane_samples(
    length: Distance,
    width: f64,
) -> (Vec<LaneSampleAssociation>, Vec<LaneSampleAssociation>) {
    let total = length.inner_meters();
    let half_width = width / 2.0;
    let mut samples = Vec::new();
    let mut s = 0.0;
    while s <= total {
        samples.push(LaneSampleAssociation {
            s,
            width: half_width,
        });
        s += 1.0;
    }
    if total % 1.0 != 0.0 {
        samples.push(LaneSampleAssociation {
            s: total,
            width: half_width,
        });
    }
    (samples.clone(), samples)
}

/// The heading of the first segment in radians, counter-clockwise from east. Computed from the
/// compass bearing, so it's `(90 - bearing)` degrees and isn't normalized.
pub fn compute_start_heading(line: &[LonLat]) -> f64 {
    if line.len() < 2 {
        return 0.0;
    }
    Angle::from_bearing(line[0].bearing_to(line[1])).radians()
}

/// A closed ring around the lane: the left boundary forwards, then the right boundary
/// backwards.
pub fn build_lane_polygon(left: &[LonLat], right: &[LonLat]) -> Vec<LonLat> {
    let mut ring = left.to_vec();
    ring.extend(right.iter().rev());
    if let Some(first) = left.first() {
        ring.push(*first);
    }
    ring
}

/// The point halfway along the lane, and the overall compass bearing from the first point to the
/// last. Only meant for drawing direction arrows.
pub fn lane_midpoint_info(center_line: &[LonLat]) -> Option<(LonLat, f64)> {
    let first = *center_line.first()?;
    let last = *center_line.last()?;
    let half = gps_length(center_line) / 2.0;

    let mut dist_so_far = Distance::ZERO;
    let mut midpoint = last;
    for pair in center_line.windows(2) {
        let step = pair[0].gps_dist(pair[1]);
        if dist_so_far + step >= half {
            midpoint = pair[0].lerp(pair[1], (half - dist_so_far).safe_percent(step));
            break;
        }
        dist_so_far += step;
    }
    if center_line.len() == 1 {
        midpoint = first;
    }
    Some((midpoint, first.bearing_to(last)))
}

/// If `to` starts within `threshold` of where `from` ends, returns `to` with its first point
/// moved exactly onto the end of `from`.
pub fn snap_lane_endpoints(
    from: &[LonLat],
    to: &[LonLat],
    threshold: Distance,
) -> Option<Vec<LonLat>> {
    let from_end = *from.last()?;
    let to_start = *to.first()?;
    if from_end.gps_dist(to_start) > threshold {
        return None;
    }
    let mut snapped = to.to_vec();
    snapped[0] = from_end;
    Some(snapped)
}
