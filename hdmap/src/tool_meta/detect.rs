//! Guessing the drawing tool from bare geometry, for shapes without encoded metadata.

use geom::Pt2D;

use super::ToolMeta;

/// Every corner of a rectangle must be this close to a right angle.
const RIGHT_ANGLE_TOLERANCE_DEGREES: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

/// Recognizes a 4-cornered ring with right angles. The ring is in ENU meters and may or may not
/// repeat its first point at the end.
pub fn detect_rotatable_rect(ring: &[Pt2D]) -> Option<ToolMeta> {
    let mut vertices = ring;
    if vertices.len() > 1 && vertices[0] == vertices[vertices.len() - 1] {
        vertices = &vertices[..vertices.len() - 1];
    }
    if vertices.len() != 4 {
        return None;
    }

    for i in 0..4 {
        let corner = angle_at(vertices[i], vertices[(i + 1) % 4], vertices[(i + 2) % 4]);
        if (corner - std::f64::consts::FRAC_PI_2).abs() > RIGHT_ANGLE_TOLERANCE_DEGREES.to_radians()
        {
            return None;
        }
    }

    Some(ToolMeta::RotatableRect {
        rotation: vertices[0].angle_to(vertices[1]).radians(),
        width: vertices[0].raw_dist_to(vertices[1]),
        height: vertices[1].raw_dist_to(vertices[2]),
    })
}

/// The best guess for any geometry: rectangles are recognized, everything else gets the plain
/// tool for its kind.
pub fn detect_tool(kind: GeometryKind, pts: &[Pt2D]) -> ToolMeta {
    match kind {
        GeometryKind::Polygon => detect_rotatable_rect(pts).unwrap_or(ToolMeta::Polygon),
        GeometryKind::LineString => ToolMeta::Line,
        GeometryKind::Point => ToolMeta::Point,
    }
}

/// The angle at `b` in the triangle a-b-c, in [0, pi]. Degenerate corners are 0.
fn angle_at(a: Pt2D, b: Pt2D, c: Pt2D) -> f64 {
    let ba = (a.x() - b.x(), a.y() - b.y());
    let bc = (c.x() - b.x(), c.y() - b.y());
    let mag_ba = (ba.0 * ba.0 + ba.1 * ba.1).sqrt();
    let mag_bc = (bc.0 * bc.0 + bc.1 * bc.1).sqrt();
    if mag_ba == 0.0 || mag_bc == 0.0 {
        return 0.0;
    }
    let cos = ((ba.0 * bc.0 + ba.1 * bc.1) / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    cos.acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{Angle, Distance};

    fn rect(rotation_degrees: f64, width: f64, height: f64) -> Vec<Pt2D> {
        let along = Angle::degrees(rotation_degrees);
        let up = along.rotate_degs(90.0);
        let p0 = Pt2D::new(10.0, -5.0);
        let p1 = p0.project_away(Distance::meters(width), along);
        let p2 = p1.project_away(Distance::meters(height), up);
        let p3 = p0.project_away(Distance::meters(height), up);
        vec![p0, p1, p2, p3, p0]
    }

    #[test]
    fn finds_rectangles() {
        match detect_rotatable_rect(&rect(25.0, 4.0, 2.5)) {
            Some(ToolMeta::RotatableRect {
                rotation,
                width,
                height,
            }) => {
                assert!((rotation - 25.0_f64.to_radians()).abs() < 1e-9);
                assert!((width - 4.0).abs() < 1e-9);
                assert!((height - 2.5).abs() < 1e-9);
            }
            other => panic!("detected {:?}", other),
        }
        // Without the closing point too
        let open = rect(0.0, 1.0, 1.0);
        assert!(detect_rotatable_rect(&open[..4]).is_some());
    }

    #[test]
    fn rejects_other_shapes() {
        let mut skewed = rect(0.0, 4.0, 2.0);
        skewed[2] = skewed[2].offset(0.2, 0.0);
        assert!(detect_rotatable_rect(&skewed).is_none());

        let triangle = vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(1.0, 0.0),
            Pt2D::new(0.0, 1.0),
            Pt2D::new(0.0, 0.0),
        ];
        assert!(detect_rotatable_rect(&triangle).is_none());
        assert_eq!(
            detect_tool(GeometryKind::Polygon, &triangle),
            ToolMeta::Polygon
        );
        assert_eq!(detect_tool(GeometryKind::LineString, &triangle), ToolMeta::Line);
        assert_eq!(detect_tool(GeometryKind::Point, &triangle[..1]), ToolMeta::Point);
    }
}
