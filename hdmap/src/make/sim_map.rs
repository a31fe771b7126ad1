use crate::make::downsample::downsample_points;
use crate::{ApolloMap, Curve, PointENU};

/// A lighter copy of the base map for the simulator: no width samples, and every lane curve
/// downsampled. Everything else is untouched.
pub fn build_sim_map(base: &ApolloMap) -> ApolloMap {
    let mut sim = base.clone();
    for lane in &mut sim.lanes {
        lane.left_samples.clear();
        lane.right_samples.clear();
        lane.left_road_samples.clear();
        lane.right_road_samples.clear();
        downsample_curve(&mut lane.central_curve);
        downsample_curve(&mut lane.left_boundary.curve);
        downsample_curve(&mut lane.right_boundary.curve);
    }
    info!("Built sim map: {}", sim.describe());
    sim
}

/// Segment metadata like length and heading describes the original curve and is kept.
fn downsample_curve(curve: &mut Curve) {
    for seg in &mut curve.segments {
        seg.points = downsample_points(&seg.points, |pt: &PointENU| pt.to_pt2d());
    }
}
