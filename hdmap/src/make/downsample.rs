//! Thinning out curve points for the sim map, the same way Apollo's `points_downsampler` does.
//! Both stages return the indices of the points to keep, always including the first and last.

use std::f64::consts::PI;

use geom::Pt2D;

/// Keep a point once the heading has turned this much since the last kept one.
const ANGLE_THRESHOLD: f64 = PI / 180.0;
const DOWNSAMPLE_DISTANCE: f64 = 5.0;
const STEEP_TURN_DOWNSAMPLE_DISTANCE: f64 = 1.0;
/// A curve whose first and last segments differ by at least this many degrees is a steep turn.
const STEEP_TURN_DEGREES: f64 = 80.0;

/// The unsigned angle between the segment starting at `start` and the one starting at `end`.
fn path_angle(pts: &[Pt2D], start: usize, end: usize) -> f64 {
    if start >= end || end + 1 >= pts.len() {
        return 0.0;
    }
    let (sx, sy) = direction(pts[start], pts[start + 1]);
    let (ex, ey) = direction(pts[end], pts[end + 1]);
    let norms = sx.hypot(sy) * ex.hypot(ey);
    if norms == 0.0 {
        return 0.0;
    }
    let angle = ((sx * ex + sy * ey) / norms).clamp(-1.0, 1.0).acos();
    if angle.is_nan() {
        0.0
    } else {
        angle
    }
}

fn direction(from: Pt2D, to: Pt2D) -> (f64, f64) {
    (to.x() - from.x(), to.y() - from.y())
}

pub fn downsample_by_angle(pts: &[Pt2D], threshold: f64) -> Vec<usize> {
    if pts.is_empty() {
        return Vec::new();
    }
    let mut keep = vec![0];
    if pts.len() == 1 {
        return keep;
    }
    let mut start = 0;
    let mut end = 1;
    let mut accumulated = 0.0;
    while end + 1 < pts.len() {
        accumulated += path_angle(pts, start, end).abs();
        if accumulated > threshold {
            keep.push(end);
            start = end;
            accumulated = 0.0;
        }
        end += 1;
    }
    keep.push(end);
    keep
}

/// Short curves are left alone. Otherwise points are kept every `rate` meters, using the
/// tighter rate for steep turns.
pub fn downsample_by_distance(pts: &[Pt2D], rate: f64, steep_turn_rate: f64) -> Vec<usize> {
    if pts.len() <= 4 {
        return (0..pts.len()).collect();
    }

    let n = pts.len();
    let (sx, sy) = direction(pts[0], pts[1]);
    let (ex, ey) = direction(pts[n - 2], pts[n - 1]);
    let norms = sx.hypot(sy) * ex.hypot(ey);
    let cos = if norms > 0.0 {
        (sx * ex + sy * ey) / norms
    } else {
        0.0
    };
    let rate = if cos <= STEEP_TURN_DEGREES.to_radians().cos() {
        steep_turn_rate
    } else {
        rate
    };

    let mut keep = vec![0];
    let mut accumulated = 0.0;
    for idx in 1..n - 1 {
        accumulated += pts[idx - 1].raw_dist_to(pts[idx]);
        if accumulated > rate {
            keep.push(idx);
            accumulated = 0.0;
        }
    }
    keep.push(n - 1);
    keep
}

/// Angle stage, then distance stage. Curves with 2 or fewer points come back unchanged.
pub fn downsample_points<T: Copy, F: Fn(&T) -> Pt2D>(pts: &[T], to_pt: F) -> Vec<T> {
    if pts.len() <= 2 {
        return pts.to_vec();
    }
    let all: Vec<Pt2D> = pts.iter().map(&to_pt).collect();
    let after_angle: Vec<usize> = downsample_by_angle(&all, ANGLE_THRESHOLD);
    let thinned: Vec<Pt2D> = after_angle.iter().map(|idx| all[*idx]).collect();
    downsample_by_distance(
        &thinned,
        DOWNSAMPLE_DISTANCE,
        STEEP_TURN_DOWNSAMPLE_DISTANCE,
    )
    .into_iter()
    .map(|idx| pts[after_angle[idx]])
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn pts(raw: &[(f64, f64)]) -> Vec<Pt2D> {
        raw.iter().map(|(x, y)| Pt2D::new(*x, *y)).collect()
    }

    fn identity(pt: &Pt2D) -> Pt2D {
        *pt
    }

    #[test]
    fn straight_line_collapses() {
        let line: Vec<Pt2D> = (0..100).map(|i| Pt2D::new(0.0, i as f64 * 0.5)).collect();
        let result = downsample_points(&line, identity);
        assert_eq!(result, vec![line[0], line[99]]);

        let five = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        assert_eq!(downsample_points(&five, identity).len(), 2);
    }

    #[test]
    fn short_curves_unchanged() {
        let two = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(downsample_points(&two, identity), two);

        let four = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0)]);
        assert_eq!(downsample_by_distance(&four, 5.0, 1.0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn angle_stage_keeps_corners() {
        // An L shape: the turn happens at index 3
        let l = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (3.0, 2.0),
            (3.0, 3.0),
        ]);
        assert_eq!(downsample_by_angle(&l, ANGLE_THRESHOLD), vec![0, 3, 6]);
    }

    #[test]
    fn steep_turns_use_the_tight_rate() {
        // A quarter circle of radius 20m, one point per degree
        let arc: Vec<Pt2D> = (0..=90)
            .map(|deg| {
                let rads = (deg as f64).to_radians();
                Pt2D::new(20.0 * rads.cos(), 20.0 * rads.sin())
            })
            .collect();
        let all = downsample_by_distance(&arc, 5.0, 1.0);
        // Points are ~0.35m apart, so roughly every third is kept
        assert!(all.len() > 20);

        let gentle: Vec<Pt2D> = (0..=30)
            .map(|deg| {
                let rads = (deg as f64).to_radians();
                Pt2D::new(20.0 * rads.cos(), 20.0 * rads.sin())
            })
            .collect();
        assert!(downsample_by_distance(&gentle, 5.0, 1.0).len() < 5);
    }

    #[test]
    fn random_curves() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..200 {
            let n = rng.gen_range(1..60);
            let mut pt = Pt2D::new(0.0, 0.0);
            let mut curve = Vec::new();
            for _ in 0..n {
                pt = pt.offset(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
                curve.push(pt);
            }
            let result = downsample_points(&curve, identity);
            assert!(result.len() <= curve.len());
            assert_eq!(result.first(), curve.first());
            assert_eq!(result.last(), curve.last());
        }
    }
}
