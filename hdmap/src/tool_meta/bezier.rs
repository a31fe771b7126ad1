use geom::LonLat;

use super::ToolMeta;

/// A bezier's anchors and absolute control points, recovered against a sampled line.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierHandles {
    pub anchors: Vec<LonLat>,
    /// Two per segment
    pub control_points: Vec<LonLat>,
}

impl BezierHandles {
    /// The stored offsets are relative to anchors that aren't stored, but a sampled curve
    /// passes through them at evenly spaced vertices. Returns `None` if the metadata isn't a
    /// bezier, or the line is too short to hold the anchors.
    pub fn resolve(meta: &ToolMeta, line: &[LonLat]) -> Option<BezierHandles> {
        let offsets = match meta {
            ToolMeta::Bezier { control_offsets } => control_offsets,
            _ => return None,
        };
        let num_segments = (offsets.len() + 1) / 2;
        if num_segments == 0 || line.len() < num_segments + 1 {
            return None;
        }

        let anchors: Vec<LonLat> = (0..=num_segments)
            .map(|i| line[i * (line.len() - 1) / num_segments])
            .collect();
        let control_points = offsets
            .iter()
            .enumerate()
            .map(|(idx, [dx, dy])| {
                let anchor = anchors[idx / 2 + idx % 2];
                LonLat::new(anchor.longitude + dx, anchor.latitude + dy)
            })
            .collect();
        Some(BezierHandles {
            anchors,
            control_points,
        })
    }
}

/// Samples consecutive cubic segments into a line. Each segment contributes
/// `samples_per_segment` points after the first anchor, so anchor `i` lands on vertex
/// `i * samples_per_segment`.
pub fn sample_bezier(
    anchors: &[LonLat],
    control_points: &[LonLat],
    samples_per_segment: usize,
) -> Vec<LonLat> {
    let mut pts = Vec::new();
    if anchors.is_empty() || samples_per_segment == 0 {
        return pts;
    }
    pts.push(anchors[0]);
    for (seg, pair) in anchors.windows(2).enumerate() {
        let (p0, p1) = (pair[0], pair[1]);
        let cp1 = control_points.get(2 * seg).copied().unwrap_or(p0);
        let cp2 = control_points.get(2 * seg + 1).copied().unwrap_or(p1);
        for i in 1..=samples_per_segment {
            let t = i as f64 / samples_per_segment as f64;
            pts.push(cubic(p0, cp1, cp2, p1, t));
        }
    }
    pts
}

fn cubic(p0: LonLat, cp1: LonLat, cp2: LonLat, p1: LonLat, t: f64) -> LonLat {
    let mt = 1.0 - t;
    let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
    LonLat::new(
        a * p0.longitude + b * cp1.longitude + c * cp2.longitude + d * p1.longitude,
        a * p0.latitude + b * cp1.latitude + c * cp2.latitude + d * p1.latitude,
    )
}
