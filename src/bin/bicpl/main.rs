//! bicpl CLI - MNI polygon object command-line tool.
//!
//! Usage: bicpl <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `bicpl --help` for available commands. Set `RUST_LOG=debug` for
//! parser diagnostics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;

use bicpl::algo::{neighbor_graph, MeshStats, NeighborOptions};
use bicpl::io::{self as obj_io, WriteOptions};

#[derive(Parser)]
#[command(name = "bicpl")]
#[command(author, version, about = "MNI polygon object (.obj) tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display object information
    Info {
        /// Input object files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Accept polygons other than triangles
        #[arg(long)]
        any_polygon: bool,

        /// Load files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Print the neighbors of every vertex, one line per vertex
    Neighbors {
        /// Input object file
        input: PathBuf,

        /// Output file (default: standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Accept polygons other than triangles
        #[arg(long)]
        any_polygon: bool,

        /// Build the graph on multiple threads
        #[arg(long)]
        parallel: bool,
    },

    /// Read an object and write it back in canonical layout
    Rewrite {
        /// Input object file
        input: PathBuf,

        /// Output object file
        output: PathBuf,

        /// Number of end indices or indices per line
        #[arg(short = 'n', long, default_value = "8")]
        values_per_line: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            inputs,
            any_polygon,
            sequential,
        } => {
            cmd_info(&inputs, any_polygon, sequential)?;
        }

        Commands::Neighbors {
            input,
            output,
            any_polygon,
            parallel,
        } => {
            cmd_neighbors(&input, output.as_deref(), any_polygon, parallel)?;
        }

        Commands::Rewrite {
            input,
            output,
            values_per_line,
        } => {
            cmd_rewrite(&input, &output, values_per_line)?;
        }
    }

    Ok(())
}

fn cmd_info(
    inputs: &[PathBuf],
    any_polygon: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = NeighborOptions::default().with_triangles_only(!any_polygon);

    let start = Instant::now();
    let results = obj_io::load_many(inputs, !sequential);
    info!("loaded {} files in {:.2?}", inputs.len(), start.elapsed());

    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        println!("File: {}", input.display());
        let stats = result.and_then(|obj| MeshStats::compute(&obj, &options));
        match stats {
            Ok(stats) => print!("{}", stats),
            Err(e) => {
                println!("Error: {}", e);
                failures += 1;
            }
        }
        println!();
    }

    if failures > 0 {
        return Err(format!("{} of {} files could not be read", failures, inputs.len()).into());
    }
    Ok(())
}

fn cmd_neighbors(
    input: &Path,
    output: Option<&Path>,
    any_polygon: bool,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let obj = obj_io::load(input)?;
    info!(
        "loaded {}: {} points, {} polygons",
        input.display(),
        obj.num_points(),
        obj.num_items()
    );

    let options = NeighborOptions::default()
        .with_triangles_only(!any_polygon)
        .with_parallel(parallel);

    let start = Instant::now();
    let graph = neighbor_graph(&obj, &options)?;
    info!(
        "built neighbor graph with {} edges in {:.2?}",
        graph.num_edges(),
        start.elapsed()
    );

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for v in 0..graph.len() {
        let line: Vec<String> = graph.sorted(v).iter().map(usize::to_string).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    writer.flush()?;

    Ok(())
}

fn cmd_rewrite(
    input: &Path,
    output: &Path,
    values_per_line: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let obj = obj_io::load(input)?;

    println!("Loaded: {} points, {} polygons", obj.num_points(), obj.num_items());

    let options = WriteOptions::default().with_values_per_line(values_per_line);
    obj_io::obj::save_with(&obj, output, &options)?;
    println!("Saved: {}", output.display());

    Ok(())
}
