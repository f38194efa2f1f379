//! quadmesh CLI - triangle to quad conversion and quad simplification.
//!
//! Usage: quadmesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `quadmesh --help` for available commands. Set `RUST_LOG=debug` for
//! per-phase logging.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use quadmesh::algo::quadrangulate::{split_into_quads, tri_to_quad_with_progress, QuadOptions};
use quadmesh::algo::simplify::{simplify_quads_with_progress, SimplifyOptions};
use quadmesh::algo::Progress;
use quadmesh::io;
use quadmesh::mesh::HalfEdgeMesh;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "quadmesh")]
#[command(author, version, about = "Triangle to quad mesh conversion and simplification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Convert a triangle mesh to quads
    Quad {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Keep leftover triangles instead of splitting everything into quads
        #[arg(long)]
        no_pure: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Simplify a quad mesh by collapsing diagonals
    Simplify {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Target number of faces
        #[arg(short = 'f', long, conflicts_with = "ratio")]
        faces: Option<usize>,

        /// Target ratio of faces to keep (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        ratio: f64,

        /// Never collapse diagonals longer than this
        #[arg(short = 'd', long)]
        max_diagonal: Option<f64>,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Convert between file formats
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },

    /// Print every vertex, face and half-edge record
    Dump {
        /// Input mesh file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,

        Commands::Quad {
            input,
            output,
            no_pure,
            sequential,
        } => cmd_quad(&input, &output, no_pure, sequential)?,

        Commands::Simplify {
            input,
            output,
            faces,
            ratio,
            max_diagonal,
            sequential,
        } => cmd_simplify(&input, &output, faces, ratio, max_diagonal, sequential)?,

        Commands::Convert { input, output } => {
            let mesh: HalfEdgeMesh = io::load(&input)?;
            io::save(&mesh, &output)?;
            println!(
                "Converted {} -> {} ({} vertices, {} faces)",
                input.display(),
                output.display(),
                mesh.num_vertices(),
                mesh.num_faces()
            );
        }

        Commands::Dump { input } => {
            let mesh: HalfEdgeMesh = io::load(&input)?;
            for line in mesh.describe() {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only ever move forward, even when a phase restarts its count
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = previous.max(raw_percent);
        if percent == previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn mesh_type(mesh: &HalfEdgeMesh) -> &'static str {
    if mesh.is_triangle_mesh() {
        "Triangle mesh"
    } else if mesh.is_quad_mesh() {
        "Quad mesh"
    } else {
        "Mixed polygon mesh"
    }
}

fn cmd_info(input: &Path) -> CliResult {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("{}", mesh.stats());
    println!("Mesh type: {}", mesh_type(&mesh));
    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Average edge length: {:.6}", mesh.average_edge_length());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    match mesh.check_correctness() {
        Ok(()) => println!("Connectivity: OK"),
        Err(e) => println!("Connectivity: {e}"),
    }

    Ok(())
}

fn cmd_quad(input: &Path, output: &Path, no_pure: bool, sequential: bool) -> CliResult {
    let mut mesh: HalfEdgeMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let options = QuadOptions::new()
        .with_pure_quads(!no_pure)
        .with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    println!("Pairing triangles ({})...", mode);

    let progress = create_progress();
    let start = Instant::now();
    let report = tri_to_quad_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("{report}");
    println!("Result: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_simplify(
    input: &Path,
    output: &Path,
    faces: Option<usize>,
    ratio: f64,
    max_diagonal: Option<f64>,
    sequential: bool,
) -> CliResult {
    let mut mesh: HalfEdgeMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let start = Instant::now();

    if mesh.is_triangle_mesh() {
        println!("Converting triangles to quads first...");
        let options = QuadOptions::new().with_parallel(!sequential);
        let report = tri_to_quad_with_progress(&mut mesh, &options, &create_progress())?;
        println!("{report}");
    } else if !mesh.is_quad_mesh() {
        println!("Splitting polygons into quads first...");
        split_into_quads(&mut mesh)?;
    }

    let mode = if sequential { "sequential" } else { "parallel" };
    let mut options = match faces {
        Some(target) => {
            println!("Simplifying to {} faces ({})...", target, mode);
            SimplifyOptions::with_target_faces(target)
        }
        None => {
            println!("Simplifying to {:.0}% of faces ({})...", ratio * 100.0, mode);
            SimplifyOptions::with_target_ratio(ratio)
        }
    }
    .with_parallel(!sequential);
    if let Some(length) = max_diagonal {
        options = options.with_max_diagonal(length);
    }

    let report = simplify_quads_with_progress(&mut mesh, &options, &create_progress())?;
    let elapsed = start.elapsed();

    println!("{report}");
    println!("Result: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
