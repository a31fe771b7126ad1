use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, Line, Pt2D};

/// Miter joins further than this multiple of the shift width from the original vertex are
/// replaced by the end of the previous shifted segment.
const MITER_LIMIT: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
    length: Distance,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine, got {}", pts.len());
        }
        if let Some(pt) = pts.iter().find(|pt| !pt.is_finite()) {
            bail!("PolyLine has a non-finite point {}", pt);
        }
        let length = pts
            .windows(2)
            .map(|pair| pair[0].dist_to(pair[1]))
            .sum::<Distance>();
        if length == Distance::ZERO {
            bail!("PolyLine has zero length: {:?}", pts);
        }
        Ok(PolyLine { pts, length })
    }

    /// Like `new`, but first removes adjacent duplicate points.
    pub fn deduping_new(mut pts: Vec<Pt2D>) -> Result<PolyLine> {
        pts.dedup();
        PolyLine::new(pts)
    }


    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    pub fn first_pt(&self) -> Pt2D {
        self.pts[0]
    }

    /// The point and direction at some distance along the line.
    pub fn dist_along(&self, dist_along: Distance) -> Result<(Pt2D, Angle)> {
        if dist_along < Distance::ZERO {
            bail!("dist_along {} is negative", dist_along);
        }
        let epsilon = Distance::meters(1e-6);
        let mut dist_left = dist_along;
        let num_lines = self.pts.len() - 1;
        for (idx, l) in self.lines().enumerate() {
            let length = l.length();
            let slack = if idx == num_lines - 1 {
                epsilon
            } else {
                Distance::ZERO
            };
            if dist_left <= length + slack {
                return Ok((l.dist_along(dist_left.min(length)), l.angle()));
            }
            dist_left -= length;
        }
        bail!("dist_along {} is longer than {}", dist_along, self.length)
    }

    /// Finds the closest point on the line to `pt`, returning its distance along the line and
    /// the point itself. Ties go to the earliest segment.
    pub fn dist_along_of_closest_pt(&self, pt: Pt2D) -> (Distance, Pt2D) {
        let mut best: Option<(f64, Distance, Pt2D)> = None;
        let mut dist_so_far = Distance::ZERO;
        for l in self.lines() {
            let (closest, along) = l.project_pt(pt);
            let dist = closest.raw_dist_to(pt);
            if best.map(|(d, _, _)| dist < d).unwrap_or(true) {
                best = Some((dist, dist_so_far + along, closest));
            }
            dist_so_far += l.length();
        }
        match best {
            Some((_, along, closest)) => (along.min(self.length), closest),
            None => (Distance::ZERO, self.first_pt()),
        }
    }

    /// Every point where this line crosses one of `others`, ordered by this line's segments
    /// first and then by the order of `others`.
    pub fn intersection_pts(&self, others: &[Line]) -> Vec<Pt2D> {
        let mut hits = Vec::new();
        for l1 in self.lines() {
            for l2 in others {
                if let Some(pt) = l1.intersection(l2) {
                    hits.push(pt);
                }
            }
        }
        hits
    }

    /// Shifting keeps the number of points the same, but the length before and after probably
    /// doesn't match up.
    pub fn shift_left(&self, width: Distance) -> Result<PolyLine> {
        self.shift_with_sharp_angles(width)
    }

    pub fn shift_right(&self, width: Distance) -> Result<PolyLine> {
        self.shift_with_sharp_angles(-width)
    }

    fn shift_with_sharp_angles(&self, width: Distance) -> Result<PolyLine> {
        if self.pts.len() == 2 {
            let l = Line::new(self.pts[0], self.pts[1]).shift_either_direction(width);
            return PolyLine::new(l.points());
        }

        let mut result: Vec<Pt2D> = Vec::new();

        let mut pt3_idx = 2;
        let mut pt1_raw = self.pts[0];
        let mut pt2_raw = self.pts[1];

        loop {
            let pt3_raw = self.pts[pt3_idx];

            let l1 = Line::new(pt1_raw, pt2_raw).shift_either_direction(width);
            let l2 = Line::new(pt2_raw, pt3_raw).shift_either_direction(width);
            // When the lines are perfectly parallel, it means pt2_shift_1st == pt2_shift_2nd and
            // the original geometry is redundant.
            let pt2_shift = match l1.infinite_intersection(&l2) {
                Some(pt) if pt.dist_to(pt2_raw) <= width.abs() * MITER_LIMIT => pt,
                _ => l1.pt2(),
            };

            if pt3_idx == 2 {
                result.push(l1.pt1());
            }
            result.push(pt2_shift);
            if pt3_idx == self.pts.len() - 1 {
                result.push(l2.pt2());
                break;
            }

            pt1_raw = pt2_raw;
            pt2_raw = pt3_raw;
            pt3_idx += 1;
        }

        if result.len() != self.pts.len() {
            bail!(
                "Shifting {} points by {} produced {}",
                self.pts.len(),
                width,
                result.len()
            );
        }
        PolyLine::new(result)
    }

    pub fn to_geo(&self) -> geo::LineString<f64> {
        geo::LineString::from(
            self.pts
                .iter()
                .map(|pt| (pt.x(), pt.y()))
                .collect::<Vec<_>>(),
        )
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for (idx, pt) in self.pts.iter().enumerate() {
            write!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
            if idx > 0 {
                write!(
                    f,
                    "    // {}, {}",
                    pt.x() - self.pts[idx - 1].x(),
                    pt.y() - self.pts[idx - 1].y()
                )?;
            }
            writeln!(f)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pl(pts: &[(f64, f64)]) -> PolyLine {
        PolyLine::new(pts.iter().map(|(x, y)| Pt2D::new(*x, *y)).collect()).unwrap()
    }

    #[test]
    fn rejects_degenerate() {
        assert!(PolyLine::new(vec![Pt2D::new(1.0, 1.0)]).is_err());
        assert!(PolyLine::new(vec![Pt2D::new(1.0, 1.0), Pt2D::new(1.0, 1.0)]).is_err());
        assert!(
            PolyLine::deduping_new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(0.0, 0.0), Pt2D::new(0.0, 3.0)])
                .unwrap()
                .points()
                .len()
                == 2
        );
    }

    #[test]
    fn shift_around_a_corner() {
        // North 10m, then east 10m
        let orig = pl(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let left = orig.shift_left(Distance::meters(1.0)).unwrap();
        let expected = [(-1.0, 0.0), (-1.0, 11.0), (10.0, 11.0)];
        for (pt, (x, y)) in left.points().iter().zip(expected.iter()) {
            assert!(pt.approx_eq(Pt2D::new(*x, *y), Distance::meters(1e-9)), "{}", left);
        }

        let right = orig.shift_right(Distance::meters(1.0)).unwrap();
        let expected = [(1.0, 0.0), (1.0, 9.0), (10.0, 9.0)];
        for (pt, (x, y)) in right.points().iter().zip(expected.iter()) {
            assert!(pt.approx_eq(Pt2D::new(*x, *y), Distance::meters(1e-9)), "{}", right);
        }
    }

    #[test]
    fn closest_pt_and_dist_along() {
        let line = pl(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        assert!((line.length().inner_meters() - 20.0).abs() < 1e-12);

        let (dist, pt) = line.dist_along_of_closest_pt(Pt2D::new(4.0, 12.0));
        assert!((dist.inner_meters() - 14.0).abs() < 1e-9);
        assert!(pt.approx_eq(Pt2D::new(4.0, 10.0), Distance::meters(1e-9)));

        let (pt, angle) = line.dist_along(Distance::meters(5.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(0.0, 5.0), Distance::meters(1e-9)));
        assert!(angle.approx_eq(Angle::degrees(90.0), 1e-6));
        assert!(line.dist_along(Distance::meters(21.0)).is_err());
    }

    #[test]
    fn dist_along_past_first_segment() {
        let line = pl(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let (pt, angle) = line.dist_along(Distance::meters(13.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(3.0, 10.0), Distance::meters(1e-9)));
        assert!(angle.approx_eq(Angle::degrees(0.0), 1e-6));

        let (pt, _) = line.dist_along(Distance::meters(10.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(0.0, 10.0), Distance::meters(1e-9)));
        let (pt, _) = line.dist_along(line.length()).unwrap();
        assert!(pt.approx_eq(Pt2D::new(10.0, 10.0), Distance::meters(1e-9)));
    }

    #[test]
    fn crossings_in_order() {
        let line = pl(&[(0.0, 0.0), (0.0, 10.0)]);
        let square = [
            Line::new(Pt2D::new(-1.0, 2.0), Pt2D::new(1.0, 2.0)),
            Line::new(Pt2D::new(1.0, 2.0), Pt2D::new(1.0, 6.0)),
            Line::new(Pt2D::new(1.0, 6.0), Pt2D::new(-1.0, 6.0)),
            Line::new(Pt2D::new(-1.0, 6.0), Pt2D::new(-1.0, 2.0)),
        ];
        let hits = line.intersection_pts(&square);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].approx_eq(Pt2D::new(0.0, 2.0), Distance::meters(1e-9)));
        assert!(hits[1].approx_eq(Pt2D::new(0.0, 6.0), Distance::meters(1e-9)));
    }
}
