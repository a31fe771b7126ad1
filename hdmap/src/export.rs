//! The whole build: base map, then sim map, then routing graph, each encoded for Apollo.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use hdutil::io::to_json;
use hdutil::Timer;

use crate::make::{
    build_base_map, build_routing_map, build_sim_map, BuildOptions, LaneProblem, RoutingConfig,
};
use crate::proto::MapCodec;
use crate::{EditorMap, ProjectConfig};

/// Lets another thread stop an export between phases. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            bail!("export cancelled");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub build: BuildOptions,
    pub routing: RoutingConfig,
    /// Also render each artifact as pretty JSON
    pub json_mirrors: bool,
}

pub struct ExportBundle {
    pub base_map: Vec<u8>,
    pub sim_map: Vec<u8>,
    pub routing_map: Vec<u8>,
    pub base_map_json: Option<String>,
    pub sim_map_json: Option<String>,
    pub routing_map_json: Option<String>,
    /// Lanes left out of every artifact
    pub problems: Vec<LaneProblem>,
}

pub fn export_maps(
    project: &ProjectConfig,
    input: &EditorMap,
    opts: &ExportOptions,
    codec: &dyn MapCodec,
    cancel: &CancelFlag,
) -> Result<ExportBundle> {
    let proj = project.projection()?;
    let mut timer = Timer::new(format!("export {}", project.name));

    cancel.check()?;
    timer.start("base map");
    let base = build_base_map(&proj, project, input, &opts.build, &mut timer)?;
    let base_map = codec.encode_map(&base.map)?;
    let base_map_json = opts.json_mirrors.then(|| to_json(&base.map));
    timer.stop("base map");

    cancel.check()?;
    timer.start("sim map");
    let sim = build_sim_map(&base.map);
    let sim_map = codec.encode_map(&sim)?;
    let sim_map_json = opts.json_mirrors.then(|| to_json(&sim));
    timer.stop("sim map");

    cancel.check()?;
    timer.start("routing map");
    let graph = build_routing_map(&base.map, &opts.routing);
    let routing_map = codec.encode_graph(&graph)?;
    let routing_map_json = opts.json_mirrors.then(|| to_json(&graph));
    timer.stop("routing map");

    if !base.problems.is_empty() {
        timer.note(format!(
            "{} lanes couldn't be built and were left out",
            base.problems.len()
        ));
    }
    Ok(ExportBundle {
        base_map,
        sim_map,
        routing_map,
        base_map_json,
        sim_map_json,
        routing_map_json,
        problems: base.problems,
    })
}
