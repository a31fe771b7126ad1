use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, Pt2D};

/// A segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn points(&self) -> Vec<Pt2D> {
        vec![self.0, self.1]
    }

    pub fn length(&self) -> Distance {
        self.pt1().dist_to(self.pt2())
    }

    pub fn angle(&self) -> Angle {
        self.pt1().angle_to(self.pt2())
    }

    /// Positive width shifts to the left of the direction of travel, negative to the right.
    pub fn shift_either_direction(&self, width: Distance) -> Line {
        let angle = self.angle().rotate_degs(90.0);
        Line(
            self.pt1().project_away(width, angle),
            self.pt2().project_away(width, angle),
        )
    }

    /// The intersection of two segments, if they cross or touch.
    pub fn intersection(&self, other: &Line) -> Option<Pt2D> {
        let (p, r) = (self.pt1(), self.delta());
        let (q, s) = (other.pt1(), other.delta());

        let denom = cross(r, s);
        if denom == 0.0 {
            // Parallel or collinear. Collinear overlaps have no single crossing point.
            return None;
        }
        let qp = (q.x() - p.x(), q.y() - p.y());
        let t = cross(qp, s) / denom;
        let u = cross(qp, r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(Pt2D::new(p.x() + t * r.0, p.y() + t * r.1))
        } else {
            None
        }
    }

    /// The intersection of the two infinite lines through these segments.
    pub fn infinite_intersection(&self, other: &Line) -> Option<Pt2D> {
        let (p, r) = (self.pt1(), self.delta());
        let (q, s) = (other.pt1(), other.delta());
        let denom = cross(r, s);
        if denom.abs() < 1e-12 {
            return None;
        }
        let qp = (q.x() - p.x(), q.y() - p.y());
        let t = cross(qp, s) / denom;
        Some(Pt2D::new(p.x() + t * r.0, p.y() + t * r.1))
    }

    pub fn dist_along(&self, dist: Distance) -> Pt2D {
        self.percent_along(dist.safe_percent(self.length()))
    }

    pub fn percent_along(&self, percent: f64) -> Pt2D {
        Pt2D::new(
            self.pt1().x() + percent * (self.pt2().x() - self.pt1().x()),
            self.pt1().y() + percent * (self.pt2().y() - self.pt1().y()),
        )
    }

    /// Projects a point onto this segment, returning the closest point and its distance from
    /// pt1.
    pub fn project_pt(&self, pt: Pt2D) -> (Pt2D, Distance) {
        let (dx, dy) = self.delta();
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return (self.pt1(), Distance::ZERO);
        }
        let t = (((pt.x() - self.pt1().x()) * dx + (pt.y() - self.pt1().y()) * dy) / len_sq)
            .clamp(0.0, 1.0);
        (self.percent_along(t), self.length() * t)
    }

    fn delta(&self) -> (f64, f64) {
        (self.1.x() - self.0.x(), self.1.y() - self.0.y())
    }
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line::new(")?;
        writeln!(f, "  Pt2D::new({}, {}),", self.0.x(), self.0.y())?;
        writeln!(f, "  Pt2D::new({}, {}),", self.1.x(), self.1.y())?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let a = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 0.0));
        let b = Line::new(Pt2D::new(4.0, -1.0), Pt2D::new(4.0, 1.0));
        assert_eq!(a.intersection(&b), Some(Pt2D::new(4.0, 0.0)));

        let c = Line::new(Pt2D::new(11.0, -1.0), Pt2D::new(11.0, 1.0));
        assert_eq!(a.intersection(&c), None);
        assert_eq!(a.infinite_intersection(&c), Some(Pt2D::new(11.0, 0.0)));

        let parallel = Line::new(Pt2D::new(0.0, 1.0), Pt2D::new(10.0, 1.0));
        assert_eq!(a.intersection(&parallel), None);
    }

    #[test]
    fn shifting_goes_left() {
        let north = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(0.0, 10.0));
        let left = north.shift_either_direction(Distance::meters(2.0));
        assert!(left.pt1().approx_eq(Pt2D::new(-2.0, 0.0), Distance::meters(1e-9)));
        let right = north.shift_either_direction(Distance::meters(-2.0));
        assert!(right.pt2().approx_eq(Pt2D::new(2.0, 10.0), Distance::meters(1e-9)));
    }

    #[test]
    fn projection_clamps() {
        let l = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 0.0));
        let (pt, dist) = l.project_pt(Pt2D::new(3.0, 5.0));
        assert!(pt.approx_eq(Pt2D::new(3.0, 0.0), Distance::meters(1e-9)));
        assert!((dist.inner_meters() - 3.0).abs() < 1e-9);
        let (pt, _) = l.project_pt(Pt2D::new(-3.0, 5.0));
        assert_eq!(pt, Pt2D::new(0.0, 0.0));
    }
}
