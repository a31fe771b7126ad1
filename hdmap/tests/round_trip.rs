use std::f64::consts::FRAC_PI_2;

use geom::{LonLat, Pt2D};
use hdmap::features::{line_feature, line_string, polygon_feature, polygon_ring, tool_meta};
use hdmap::{
    decode_tool_meta, export_maps, parse_base_map, sample_bezier, ApolloMap, BoundaryType,
    CancelFlag, CrosswalkFeature, EditorMap, ExportOptions, JunctionFeature, LaneFeature,
    MapCodec, PointENU, ProjectConfig, ProtobufCodec, SignalFeature, ToolMeta,
};

fn project() -> ProjectConfig {
    ProjectConfig::new("round trip", 37.4153, -122.0119)
}

fn gps(pts: &[(f64, f64)]) -> Vec<LonLat> {
    let proj = project().projection().unwrap();
    pts.iter()
        .map(|(x, y)| proj.to_lon_lat(Pt2D::new(*x, *y)))
        .collect()
}

fn sample_map() -> EditorMap {
    let mut map = EditorMap::new();

    let mut south = LaneFeature::new("lane_1", &gps(&[(0.0, 0.0), (0.0, 50.0)]));
    south.successor_ids = vec!["lane_2".to_string()];
    let mut north = LaneFeature::new(
        "lane_2",
        &gps(&[(0.0, 50.0), (0.0, 75.0), (0.0, 100.0)]),
    );
    north.predecessor_ids = vec!["lane_1".to_string()];
    north.junction_id = Some("junction_1".to_string());
    map.lanes = vec![south, north];

    map.junctions.push(JunctionFeature::new(
        "junction_1",
        &gps(&[(-10.0, 60.0), (10.0, 60.0), (10.0, 90.0), (-10.0, 90.0)]),
    ));

    let rect = ToolMeta::RotatableRect {
        rotation: 0.0,
        width: 8.0,
        height: 4.0,
    };
    map.crosswalks.push(CrosswalkFeature {
        id: "crosswalk_1".to_string(),
        polygon: polygon_feature(
            &gps(&[(-4.0, 20.0), (4.0, 20.0), (4.0, 24.0), (-4.0, 24.0)]),
            Some(&rect),
        ),
    });

    map.signals.push(SignalFeature::new(
        "signal_1",
        gps(&[(3.0, 45.0)])[0],
        &gps(&[(-3.0, 45.0), (3.0, 45.0)]),
    ));
    map
}

#[test]
fn straight_lane_north() {
    let mut map = EditorMap::new();
    map.lanes
        .push(LaneFeature::new("lane_1", &gps(&[(0.0, 0.0), (0.0, 50.0)])));
    let codec = ProtobufCodec;
    let bundle = export_maps(
        &project(),
        &map,
        &ExportOptions::default(),
        &codec,
        &CancelFlag::new(),
    )
    .unwrap();
    assert!(bundle.problems.is_empty());

    let base = codec.decode_map(&bundle.base_map).unwrap();
    assert_eq!(base.lanes.len(), 1);
    let lane = &base.lanes[0];
    assert!((lane.length - 50.0).abs() < 0.5);
    assert!((lane.central_curve.segments[0].heading - FRAC_PI_2).abs() < 0.01);
    for boundary in [&lane.left_boundary, &lane.right_boundary] {
        assert_eq!(boundary.boundary_types.len(), 1);
        assert_eq!(boundary.boundary_types[0].types, vec![BoundaryType::DottedWhite]);
    }

    let graph = codec.decode_graph(&bundle.routing_map).unwrap();
    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.edges.is_empty());
}

#[test]
fn export_then_import() {
    hdutil::logger::setup_for_tests();
    let input = sample_map();
    let codec = ProtobufCodec;
    let bundle = export_maps(
        &project(),
        &input,
        &ExportOptions::default(),
        &codec,
        &CancelFlag::new(),
    )
    .unwrap();

    let parsed = parse_base_map(&codec, &bundle.base_map).unwrap();
    assert_eq!(parsed.project.name, "round trip");
    assert!((parsed.project.origin_lat - 37.4153).abs() < 1e-12);
    assert!((parsed.project.origin_lon - -122.0119).abs() < 1e-12);

    let output = &parsed.map;
    assert_eq!(output.lanes.len(), input.lanes.len());
    assert_eq!(output.junctions.len(), input.junctions.len());
    assert_eq!(output.crosswalks.len(), input.crosswalks.len());
    assert_eq!(output.signals.len(), input.signals.len());

    let proj = project().projection().unwrap();
    for (before, after) in input.lanes.iter().zip(output.lanes.iter()) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.successor_ids, after.successor_ids);
        assert_eq!(before.predecessor_ids, after.predecessor_ids);
        assert_eq!(before.junction_id, after.junction_id);
        assert!((after.width - before.width).abs() < 1e-6);

        let pts1 = line_string(&before.center_line).unwrap();
        let pts2 = line_string(&after.center_line).unwrap();
        assert_eq!(pts1.len(), pts2.len());
        for (a, b) in pts1.iter().zip(pts2.iter()) {
            let dist = proj.to_enu(*a).dist_to(proj.to_enu(*b));
            assert!(dist.inner_meters() <= 0.001, "centerline moved {}", dist);
        }
        assert_eq!(tool_meta(&after.center_line), Some(ToolMeta::Line));
    }

    // The crosswalk remembers how it was drawn
    match tool_meta(&output.crosswalks[0].polygon) {
        Some(ToolMeta::RotatableRect {
            rotation,
            width,
            height,
        }) => {
            assert!(rotation.abs() < 1e-3);
            assert!((width - 8.0).abs() < 0.01);
            assert!((height - 4.0).abs() < 0.01);
        }
        other => panic!("expected a rect, got {:?}", other),
    }
    let ring = polygon_ring(&output.junctions[0].polygon).unwrap();
    assert_eq!(ring.first(), ring.last());
}

#[test]
fn json_mirrors() {
    let codec = ProtobufCodec;
    let bundle = export_maps(
        &project(),
        &sample_map(),
        &ExportOptions {
            json_mirrors: true,
            ..Default::default()
        },
        &codec,
        &CancelFlag::new(),
    )
    .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(bundle.base_map_json.as_ref().unwrap()).unwrap();
    assert_eq!(json["lanes"].as_array().unwrap().len(), 2);
    assert!(bundle.sim_map_json.is_some());
    assert!(bundle.routing_map_json.is_some());
}

fn export_base(project: &ProjectConfig, map: &EditorMap) -> ApolloMap {
    let codec = ProtobufCodec;
    let bundle = export_maps(
        project,
        map,
        &ExportOptions::default(),
        &codec,
        &CancelFlag::new(),
    )
    .unwrap();
    codec.decode_map(&bundle.base_map).unwrap()
}

/// Coordinates within half a slot step carry the same clean value and the same metadata slot.
fn assert_same_slots(before: &[PointENU], after: &[PointENU]) {
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a.x - b.x).abs() < 5e-11, "{} vs {}", a.x, b.x);
        assert!((a.y - b.y).abs() < 5e-11, "{} vs {}", a.y, b.y);
    }
}

#[test]
fn reexport_keeps_metadata() {
    let anchors = gps(&[(0.0, 0.0), (30.0, 20.0), (60.0, 0.0)]);
    let control_points = gps(&[(5.0, 15.0), (20.0, 25.0), (40.0, 15.0), (55.0, 10.0)]);
    let bezier = ToolMeta::bezier(&anchors, &control_points);
    let mut map = EditorMap::new();
    let mut lane = LaneFeature::new("curvy", &anchors);
    let sampled = sample_bezier(&anchors, &control_points, 40);
    lane.center_line = line_feature(&sampled, Some(&bezier));
    map.lanes.push(lane);

    let rect = ToolMeta::RotatableRect {
        rotation: 0.0,
        width: 8.0,
        height: 4.0,
    };
    map.crosswalks.push(CrosswalkFeature {
        id: "crosswalk_1".to_string(),
        polygon: polygon_feature(
            &gps(&[(26.0, 8.0), (34.0, 8.0), (34.0, 12.0), (26.0, 12.0)]),
            Some(&rect),
        ),
    });

    let first = export_base(&project(), &map);
    let bytes = ProtobufCodec.encode_map(&first).unwrap();
    let parsed = parse_base_map(&ProtobufCodec, &bytes).unwrap();
    let second = export_base(&parsed.project, &parsed.map);

    let lane1 = first.lanes[0].central_curve.points();
    let lane2 = second.lanes[0].central_curve.points();
    assert!(lane1.len() > 5);
    assert_eq!(decode_tool_meta(&lane1).unwrap().meta, bezier);
    assert_eq!(decode_tool_meta(&lane2).unwrap().meta, bezier);
    assert_same_slots(&lane1, &lane2);

    let cw1 = &first.crosswalks[0].polygon;
    let cw2 = &second.crosswalks[0].polygon;
    assert_eq!(decode_tool_meta(cw1).unwrap().meta, rect);
    assert_eq!(decode_tool_meta(cw2).unwrap().meta, rect);
    assert_same_slots(cw1, cw2);
}
