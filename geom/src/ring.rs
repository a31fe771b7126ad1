use std::fmt;

use anyhow::{bail, Result};
use geo::Contains;
use serde::{Deserialize, Serialize};

use crate::{Line, Pt2D};

/// Like a PolyLine, but closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with only {} points", pts.len());
        }
        if pts[0] != pts[pts.len() - 1] {
            bail!("Can't make a ring with mismatching first/last points");
        }
        if let Some(pt) = pts.iter().find(|pt| !pt.is_finite()) {
            bail!("Ring has a non-finite point {}", pt);
        }
        Ok(Ring { pts })
    }

    /// Closes the points if needed before making the ring.
    pub fn closing(mut pts: Vec<Pt2D>) -> Result<Ring> {
        if let (Some(first), Some(last)) = (pts.first().copied(), pts.last().copied()) {
            if first != last {
                pts.push(first);
            }
        }
        Ring::new(pts)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    /// The vertices, without repeating the first at the end.
    pub fn open_points(&self) -> &[Pt2D] {
        &self.pts[..self.pts.len() - 1]
    }

    pub fn lines(&self) -> Vec<Line> {
        self.pts
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
            .collect()
    }

    /// Points exactly on the boundary don't count.
    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.to_geo().contains(&pt.to_geo())
    }

    pub fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            geo::LineString::from(
                self.pts
                    .iter()
                    .map(|pt| (pt.x(), pt.y()))
                    .collect::<Vec<_>>(),
            ),
            Vec::new(),
        )
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}
