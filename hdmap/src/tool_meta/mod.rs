//! Drawing-tool metadata that survives a trip through Apollo's binary format.
//!
//! Apollo has nowhere to record which editor tool drew a shape, so the metadata is hidden in the
//! low digits of the ENU coordinates themselves. Every coordinate keeps 4 decimal places
//! (0.1mm), and the next 6 decimal digits hold one integer "slot":
//!
//! - vertex 0, x: `tool_code * 10000 + payload_slots`
//! - vertex 0, y: the sentinel `314159`
//! - vertex 1 onwards: the payload, two slots per vertex
//!
//! Packing `|coord| * 1e10` into an f64 is only exact while it's below 2^53, so coordinates
//! further than roughly 900km from the origin can't carry metadata.
//!
//! Geometry with no valid header falls back to `detect`.

mod bezier;
pub mod detect;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use geom::LonLat;

pub use self::bezier::{sample_bezier, BezierHandles};
use crate::PointENU;

const PRECISION: f64 = 1e4;
const META_SPACE: i64 = 1_000_000;
const COMBINED_SCALE: f64 = 1e10;
const MAGIC: i64 = 314159;
const SIGNED_BIAS: i64 = 500_000;
/// Bezier offsets are stored in units of 1e-7 degrees.
const OFFSET_SCALE: f64 = 1e7;
/// The header keeps the slot count in its last 4 digits.
const MAX_SLOTS: usize = 9999;

/// How an element's geometry was drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolMeta {
    Point,
    Line,
    /// `control_offsets` has two entries per curve segment: the first control point relative to
    /// the segment's start anchor, then the second relative to its end anchor. Offsets are
    /// `[dlon, dlat]` in degrees.
    Bezier { control_offsets: Vec<[f64; 2]> },
    /// Rotation in radians, width and height in meters.
    RotatableRect {
        rotation: f64,
        width: f64,
        height: f64,
    },
    Polygon,
}

impl ToolMeta {
    /// Describes a bezier from its anchors and absolute control points (two per segment).
    /// Offsets are quantized to what the encoding can store.
    pub fn bezier(anchors: &[LonLat], control_points: &[LonLat]) -> ToolMeta {
        let mut control_offsets = Vec::new();
        for (idx, cp) in control_points.iter().enumerate() {
            let anchor_idx = idx / 2 + idx % 2;
            let anchor = anchors.get(anchor_idx).copied().unwrap_or(LonLat::new(0.0, 0.0));
            control_offsets.push([
                decode_offset(encode_offset(cp.longitude - anchor.longitude)),
                decode_offset(encode_offset(cp.latitude - anchor.latitude)),
            ]);
        }
        ToolMeta::Bezier { control_offsets }
    }

    fn code(&self) -> i64 {
        match self {
            ToolMeta::Point => 1,
            ToolMeta::Line => 2,
            ToolMeta::Bezier { .. } => 3,
            ToolMeta::RotatableRect { .. } => 4,
            ToolMeta::Polygon => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolMeta::Point => "point",
            ToolMeta::Line => "line",
            ToolMeta::Bezier { .. } => "bezier",
            ToolMeta::RotatableRect { .. } => "rotatable_rect",
            ToolMeta::Polygon => "polygon",
        }
    }

    fn payload(&self) -> Vec<i64> {
        match self {
            ToolMeta::RotatableRect {
                rotation,
                width,
                height,
            } => vec![
                ((rotation.to_degrees() * 100.0).round() as i64).rem_euclid(36000),
                0,
                to_slot((width * 1000.0).round() as i64),
                to_slot((height * 1000.0).round() as i64),
            ],
            ToolMeta::Bezier { control_offsets } => control_offsets
                .iter()
                .flat_map(|[dx, dy]| [encode_offset(*dx), encode_offset(*dy)])
                .collect(),
            ToolMeta::Point | ToolMeta::Line | ToolMeta::Polygon => Vec::new(),
        }
    }

    /// How many vertices a shape needs to carry this metadata.
    pub fn vertices_needed(&self) -> usize {
        1 + (self.payload().len() + 1) / 2
    }
}

/// The result of finding metadata in some points.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedToolMeta {
    pub meta: ToolMeta,
    /// The same points, with every coordinate stripped back to 4 decimal places.
    pub clean_points: Vec<PointENU>,
}

/// Hides the metadata in the coordinates. Fails if there aren't enough vertices to hold the
/// payload.
pub fn encode_tool_meta(points: &[PointENU], meta: &ToolMeta) -> Result<Vec<PointENU>> {
    if points.is_empty() {
        bail!("Can't encode {} metadata into no points", meta.name());
    }
    let payload = meta.payload();
    if payload.len() > MAX_SLOTS {
        bail!(
            "{} metadata needs {} slots, but the header can only count {}",
            meta.name(),
            payload.len(),
            MAX_SLOTS
        );
    }
    let available = (points.len() - 1) * 2;
    if payload.len() > available {
        bail!(
            "{} metadata needs {} slots, but {} points only have {}",
            meta.name(),
            payload.len(),
            points.len(),
            available
        );
    }

    let mut result = points.to_vec();
    result[0].x = encode_slot(points[0].x, meta.code() * 10000 + payload.len() as i64);
    result[0].y = encode_slot(points[0].y, MAGIC);
    for (idx, pair) in payload.chunks(2).enumerate() {
        let pt = &mut result[idx + 1];
        pt.x = encode_slot(pt.x, pair[0]);
        pt.y = encode_slot(pt.y, pair.get(1).copied().unwrap_or(0));
    }
    Ok(result)
}

/// Returns `None` when the points don't carry a valid header. That's the normal case for maps
/// produced by other tools.
pub fn decode_tool_meta(points: &[PointENU]) -> Option<DecodedToolMeta> {
    let first = points.first()?;
    if decode_slot(first.y).1 != MAGIC {
        return None;
    }
    let header = decode_slot(first.x).1;
    let code = header / 10000;
    let num_slots = (header % 10000) as usize;
    if num_slots > (points.len() - 1) * 2 {
        return None;
    }

    let mut payload = Vec::with_capacity(num_slots);
    for pt in &points[1..] {
        if payload.len() < num_slots {
            payload.push(decode_slot(pt.x).1);
        }
        if payload.len() < num_slots {
            payload.push(decode_slot(pt.y).1);
        }
    }

    let meta = match code {
        1 => ToolMeta::Point,
        2 => ToolMeta::Line,
        3 => {
            let mut control_offsets = Vec::new();
            if payload.len() >= 4 {
                for pair in payload.chunks(2) {
                    control_offsets.push([
                        decode_offset(pair[0]),
                        decode_offset(pair.get(1).copied().unwrap_or(SIGNED_BIAS)),
                    ]);
                }
            }
            ToolMeta::Bezier { control_offsets }
        }
        4 => {
            if payload.len() >= 4 {
                ToolMeta::RotatableRect {
                    rotation: (payload[0] as f64 / 100.0).to_radians(),
                    width: payload[2] as f64 / 1000.0,
                    height: payload[3] as f64 / 1000.0,
                }
            } else {
                ToolMeta::RotatableRect {
                    rotation: 0.0,
                    width: 0.0,
                    height: 0.0,
                }
            }
        }
        5 => ToolMeta::Polygon,
        _ => return None,
    };

    let clean_points = points
        .iter()
        .map(|pt| PointENU {
            x: decode_slot(pt.x).0,
            y: decode_slot(pt.y).0,
            z: pt.z,
        })
        .collect();
    Some(DecodedToolMeta { meta, clean_points })
}

/// Packs a 6-digit integer below the 4th decimal place of a coordinate.
fn encode_slot(coord: f64, meta: i64) -> f64 {
    let sign = if coord >= 0.0 { 1.0 } else { -1.0 };
    let rounded = (coord.abs() * PRECISION).round() as i64;
    let packed = rounded * META_SPACE + meta;
    sign * (packed as f64) / COMBINED_SCALE
}

/// Returns (clean coordinate, metadata integer).
fn decode_slot(coord: f64) -> (f64, i64) {
    let combined = (coord.abs() * COMBINED_SCALE).round() as i64;
    let meta = combined % META_SPACE;
    let rounded = combined / META_SPACE;
    let sign = if coord < 0.0 { -1.0 } else { 1.0 };
    (sign * (rounded as f64) / PRECISION, meta)
}

fn to_slot(value: i64) -> i64 {
    value.clamp(0, META_SPACE - 1)
}

fn encode_offset(degrees: f64) -> i64 {
    to_slot((degrees * OFFSET_SCALE).round() as i64 + SIGNED_BIAS)
}

fn decode_offset(slot: i64) -> f64 {
    (slot - SIGNED_BIAS) as f64 / OFFSET_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn square() -> Vec<PointENU> {
        vec![
            PointENU::new(12.345678, -45.678912),
            PointENU::new(16.8, -45.6),
            PointENU::new(16.8, -40.1),
            PointENU::new(12.3, -40.1),
        ]
    }

    #[test]
    fn slots() {
        let encoded = encode_slot(-1234.56789, 314159);
        let (clean, meta) = decode_slot(encoded);
        assert_eq!(meta, 314159);
        assert_eq!(clean, -1234.5679);
        assert!((encoded - -1234.5679).abs() < 1e-4);

        let (clean, meta) = decode_slot(0.0);
        assert_eq!((clean, meta), (0.0, 0));
    }

    #[test]
    fn rotatable_rect_round_trip() {
        let meta = ToolMeta::RotatableRect {
            rotation: 30.0_f64.to_radians(),
            width: 4.5,
            height: 2.25,
        };
        let encoded = encode_tool_meta(&square(), &meta).unwrap();
        let decoded = decode_tool_meta(&encoded).unwrap();
        assert_eq!(decoded.meta, meta);
        for (orig, clean) in square().iter().zip(decoded.clean_points.iter()) {
            assert!((orig.x - clean.x).abs() <= 1e-4);
            assert!((orig.y - clean.y).abs() <= 1e-4);
        }
    }

    #[test]
    fn negative_rotation_wraps() {
        let meta = ToolMeta::RotatableRect {
            rotation: -90.0_f64.to_radians(),
            width: 1.0,
            height: 1.0,
        };
        let decoded = decode_tool_meta(&encode_tool_meta(&square(), &meta).unwrap()).unwrap();
        match decoded.meta {
            ToolMeta::RotatableRect { rotation, .. } => {
                assert!((rotation - 270.0_f64.to_radians()).abs() < 1e-12)
            }
            other => panic!("decoded {:?}", other),
        }
    }

    #[test]
    fn simple_tools_round_trip() {
        let line = vec![PointENU::new(0.5, 0.25), PointENU::new(-3.0, 7.0)];
        for meta in [ToolMeta::Point, ToolMeta::Line, ToolMeta::Polygon] {
            let decoded = decode_tool_meta(&encode_tool_meta(&line, &meta).unwrap()).unwrap();
            assert_eq!(decoded.meta, meta);
            assert_eq!(decoded.clean_points, line);
        }
        let single = vec![PointENU::new(1.0, 1.0)];
        assert_eq!(
            decode_tool_meta(&encode_tool_meta(&single, &ToolMeta::Point).unwrap())
                .unwrap()
                .meta,
            ToolMeta::Point
        );
    }

    #[test]
    fn bezier_round_trip() {
        let anchors = vec![LonLat::new(-122.0, 37.4), LonLat::new(-121.999, 37.401)];
        let control_points = vec![
            LonLat::new(-121.9997, 37.4001),
            LonLat::new(-121.9993, 37.4012),
        ];
        let meta = ToolMeta::bezier(&anchors, &control_points);
        match &meta {
            ToolMeta::Bezier { control_offsets } => {
                assert_eq!(control_offsets.len(), 2);
                assert!((control_offsets[0][0] - 0.0003).abs() < 1e-9);
                assert!((control_offsets[1][1] - 0.0002).abs() < 1e-9);
            }
            other => panic!("built {:?}", other),
        }

        let pts: Vec<PointENU> = (0..21).map(|i| PointENU::new(i as f64, 2.0 * i as f64)).collect();
        let decoded = decode_tool_meta(&encode_tool_meta(&pts, &meta).unwrap()).unwrap();
        assert_eq!(decoded.meta, meta);
    }

    #[test]
    fn payload_must_fit() {
        let meta = ToolMeta::RotatableRect {
            rotation: 0.0,
            width: 1.0,
            height: 1.0,
        };
        assert_eq!(meta.vertices_needed(), 3);
        let two = vec![PointENU::new(0.0, 0.0), PointENU::new(1.0, 0.0)];
        assert!(encode_tool_meta(&two, &meta).is_err());
        assert!(encode_tool_meta(&[], &ToolMeta::Line).is_err());

        // A header claiming more payload than there are vertices is ignored.
        let mut forged = encode_tool_meta(&square(), &meta).unwrap();
        forged.truncate(2);
        assert!(decode_tool_meta(&forged).is_none());
    }

    #[test]
    fn slot_count_limit() {
        let points: Vec<PointENU> = (0..6000)
            .map(|i| PointENU::new(i as f64, 0.5 * i as f64))
            .collect();

        // 4999 segments need 9998 slots, which still fits the header
        let fits = ToolMeta::Bezier {
            control_offsets: vec![[1e-5, -1e-5]; 4999],
        };
        let encoded = encode_tool_meta(&points, &fits).unwrap();
        assert_eq!(decode_tool_meta(&encoded).unwrap().meta, fits);

        let too_many = ToolMeta::Bezier {
            control_offsets: vec![[1e-5, -1e-5]; 5000],
        };
        let err = encode_tool_meta(&points, &too_many).unwrap_err();
        assert!(err.to_string().contains("header can only count 9999"));
    }

    #[test]
    fn unknown_tool_code() {
        let pts = vec![
            PointENU::new(encode_slot(5.0, 9 * 10000), encode_slot(5.0, MAGIC)),
            PointENU::new(1.0, 1.0),
        ];
        assert!(decode_tool_meta(&pts).is_none());
    }

    #[test]
    fn hand_drawn_geometry_has_no_header() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for _ in 0..1000 {
            let n = rng.gen_range(1..10);
            let pts: Vec<PointENU> = (0..n)
                .map(|_| {
                    PointENU::new(
                        rng.gen_range(-5000.0..5000.0),
                        rng.gen_range(-5000.0..5000.0),
                    )
                })
                .collect();
            assert!(decode_tool_meta(&pts).is_none(), "{:?}", pts);
        }
    }
}
