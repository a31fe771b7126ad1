//! Command-line access to the HD map builder: turn an editor document into Apollo maps, read a
//! base map back, check a document for mistakes, or print a binary map as JSON.

#[macro_use]
extern crate log;

use anyhow::{bail, Result};
use structopt::StructOpt;

use hdmap::{
    export_maps, parse_base_map, validate_map, CancelFlag, EditorDocument, ExportOptions,
    MapCodec, ProtobufCodec, RoutingConfig, Severity,
};
use hdutil::io::{read_json, slurp_file, to_json, write_binary, write_json};

#[derive(StructOpt)]
#[structopt(name = "hdmap", about = "Build and inspect Apollo HD maps")]
enum Command {
    /// Build base_map.bin, sim_map.bin, and routing_map.bin from an editor document
    Build {
        /// The path to an editor document (JSON)
        #[structopt(long)]
        input: String,
        /// The directory to write the maps into
        #[structopt(long)]
        output_dir: String,
        /// Also write a .json mirror next to each binary
        #[structopt(long)]
        json: bool,
        /// The path to a JSON routing config. Apollo's defaults are used if omitted.
        #[structopt(long)]
        routing_config: Option<String>,
        /// Don't hide drawing tool metadata in the exported coordinates
        #[structopt(long)]
        no_tool_meta: bool,
    },
    /// Read a base_map.bin back into an editor document
    Import {
        /// The path to a base_map.bin
        #[structopt(long)]
        input: String,
        /// The path to write the editor document
        #[structopt(long)]
        output: String,
    },
    /// Check an editor document for broken references and odd topology
    Validate {
        /// The path to an editor document (JSON)
        #[structopt(long)]
        input: String,
    },
    /// Print a binary map as JSON
    #[structopt(name = "dump-json")]
    DumpJSON {
        /// The path to a base_map.bin, sim_map.bin, or routing_map.bin
        #[structopt(long)]
        input: String,
        /// The input is a routing graph
        #[structopt(long)]
        graph: bool,
    },
}

fn main() -> Result<()> {
    let cmd = Command::from_args();

    // Logs go to STDERR, but dumps should stay clean anyway
    if !matches!(cmd, Command::DumpJSON { .. }) {
        hdutil::logger::setup();
    }

    match cmd {
        Command::Build {
            input,
            output_dir,
            json,
            routing_config,
            no_tool_meta,
        } => build(input, output_dir, json, routing_config, no_tool_meta),
        Command::Import { input, output } => import(input, output),
        Command::Validate { input } => validate(input),
        Command::DumpJSON { input, graph } => dump_json(input, graph),
    }
}

fn build(
    input: String,
    output_dir: String,
    json: bool,
    routing_config: Option<String>,
    no_tool_meta: bool,
) -> Result<()> {
    let doc: EditorDocument = read_json(&input)?;
    let mut opts = ExportOptions {
        json_mirrors: json,
        ..Default::default()
    };
    opts.build.embed_tool_meta = !no_tool_meta;
    if let Some(path) = routing_config {
        opts.routing = read_json::<RoutingConfig>(&path)?;
    }

    let bundle = export_maps(
        &doc.project,
        &doc.map,
        &opts,
        &ProtobufCodec,
        &CancelFlag::new(),
    )?;
    for problem in &bundle.problems {
        warn!("Skipped lane {}: {}", problem.lane_id, problem.reason);
    }

    for (name, bytes, mirror) in [
        ("base_map", &bundle.base_map, &bundle.base_map_json),
        ("sim_map", &bundle.sim_map, &bundle.sim_map_json),
        ("routing_map", &bundle.routing_map, &bundle.routing_map_json),
    ] {
        write_binary(&format!("{}/{}.bin", output_dir, name), bytes)?;
        if let Some(contents) = mirror {
            write_binary(
                &format!("{}/{}.json", output_dir, name),
                contents.as_bytes(),
            )?;
        }
    }
    Ok(())
}

fn import(input: String, output: String) -> Result<()> {
    let bytes = slurp_file(&input)?;
    let parsed = parse_base_map(&ProtobufCodec, &bytes)?;
    write_json(
        &output,
        &EditorDocument {
            project: parsed.project,
            map: parsed.map,
        },
    )
}

fn validate(input: String) -> Result<()> {
    let doc: EditorDocument = read_json(&input)?;
    let report = validate_map(&doc.map);
    for issue in &report.issues {
        match issue.severity {
            Severity::Error => error!("{}", issue),
            Severity::Warning => warn!("{}", issue),
            Severity::Info => info!("{}", issue),
        }
    }
    let stats = &report.stats;
    println!(
        "{} lanes, {} connections, {} isolated. {} errors, {} warnings, {} info",
        stats.total_lanes,
        stats.total_connections,
        stats.isolated_lanes,
        stats.error_count,
        stats.warning_count,
        stats.info_count
    );
    if report.has_errors() {
        bail!("{} has {} errors", input, stats.error_count);
    }
    Ok(())
}

fn dump_json(input: String, graph: bool) -> Result<()> {
    let bytes = slurp_file(&input)?;
    let codec = ProtobufCodec;
    if graph {
        println!("{}", to_json(&codec.decode_graph(&bytes)?));
    } else {
        println!("{}", to_json(&codec.decode_map(&bytes)?));
    }
    Ok(())
}
