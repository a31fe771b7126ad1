//! Reading and writing the GeoJSON features that carry editor geometry. Drawing-tool metadata
//! rides along in the `_toolMeta` property.

use anyhow::{bail, Result};
use geojson::{Feature, Geometry, JsonObject, Value};

use geom::LonLat;

use crate::ToolMeta;

pub const TOOL_META_KEY: &str = "_toolMeta";

pub fn line_string(feature: &Feature) -> Result<Vec<LonLat>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::LineString(pts)) => pts.iter().map(|pt| position(pt)).collect(),
        other => bail!("expected LineString, got {}", kind(other)),
    }
}

/// The outer ring of a polygon, as stored (normally closed).
pub fn polygon_ring(feature: &Feature) -> Result<Vec<LonLat>> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => match rings.first() {
            Some(ring) => ring.iter().map(|pt| position(pt)).collect(),
            None => bail!("Polygon has no rings"),
        },
        other => bail!("expected Polygon, got {}", kind(other)),
    }
}

pub fn point(feature: &Feature) -> Result<LonLat> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(pt)) => position(pt),
        other => bail!("expected Point, got {}", kind(other)),
    }
}

pub fn tool_meta(feature: &Feature) -> Option<ToolMeta> {
    let value = feature.properties.as_ref()?.get(TOOL_META_KEY)?;
    match serde_json::from_value(value.clone()) {
        Ok(meta) => Some(meta),
        Err(err) => {
            debug!("Ignoring unreadable {}: {}", TOOL_META_KEY, err);
            None
        }
    }
}

pub fn line_feature(pts: &[LonLat], meta: Option<&ToolMeta>) -> Feature {
    make_feature(
        Value::LineString(pts.iter().map(|pt| pt.to_geojson_position()).collect()),
        meta,
    )
}

/// Closes the ring if needed.
pub fn polygon_feature(ring: &[LonLat], meta: Option<&ToolMeta>) -> Feature {
    let mut pts: Vec<Vec<f64>> = ring.iter().map(|pt| pt.to_geojson_position()).collect();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            pts.push(first.to_geojson_position());
        }
    }
    make_feature(Value::Polygon(vec![pts]), meta)
}

pub fn point_feature(pt: LonLat) -> Feature {
    make_feature(Value::Point(pt.to_geojson_position()), None)
}

fn make_feature(value: Value, meta: Option<&ToolMeta>) -> Feature {
    let properties = meta.and_then(|meta| {
        let mut props = JsonObject::new();
        props.insert(TOOL_META_KEY.to_string(), serde_json::to_value(meta).ok()?);
        Some(props)
    });
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties,
        foreign_members: None,
    }
}

fn position(pt: &[f64]) -> Result<LonLat> {
    if pt.len() < 2 {
        bail!("position needs at least 2 numbers, got {:?}", pt);
    }
    Ok(LonLat::new(pt[0], pt[1]))
}

fn kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "no geometry",
        Some(Value::Point(_)) => "Point",
        Some(Value::MultiPoint(_)) => "MultiPoint",
        Some(Value::LineString(_)) => "LineString",
        Some(Value::MultiLineString(_)) => "MultiLineString",
        Some(Value::Polygon(_)) => "Polygon",
        Some(Value::MultiPolygon(_)) => "MultiPolygon",
        Some(Value::GeometryCollection(_)) => "GeometryCollection",
    }
}
