//! flatdet - resample curved-detector projections onto a flat detector
//!
//! Reads a raw curved projection volume and a precomputed position table,
//! runs the resampling kernel and writes the flat projection volume.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use flatdet::config::Config;
use flatdet::report::RunReport;
use flatdet::{io, resample_into, ColumnStats, ProjectionVolume, VolumeShape};

/// flatdet - curved to flat detector resampling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Curved projection volume (raw little-endian f32)
    #[arg(short, long)]
    input: PathBuf,

    /// Position table, one entry per flat column (raw little-endian f64)
    #[arg(short = 'p', long)]
    positions: PathBuf,

    /// Flat projection volume to write (raw little-endian f32)
    #[arg(short, long)]
    output: PathBuf,

    /// Number of projections in the input volume
    #[arg(long)]
    projections: usize,

    /// Number of detector rows per projection
    #[arg(long)]
    rows: usize,

    /// Number of curved detector columns
    #[arg(long)]
    columns: usize,

    /// Worker threads for the global pool (overrides config, 0 = all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Run on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Write a JSON run report next to the output
    #[arg(long)]
    report: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("flatdet v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_or_create(&args.config)?;

    // CLI flags override the config file
    if let Some(threads) = args.threads {
        config.resample.threads = threads;
    }
    if args.sequential {
        config.resample.parallel = false;
    }
    let write_report = args.report || config.io.write_report;
    config.resample.install_global_pool()?;
    let options = config.resample.to_options();

    let shape = VolumeShape::new(args.projections, args.rows, args.columns);
    let curved = io::read_volume(&args.input, shape)?;
    let positions = io::read_positions(&args.positions)?;

    let flat_shape = shape.with_columns(positions.len());
    let mut flat = ProjectionVolume::zeros(flat_shape)
        .with_context(|| format!("Cannot allocate flat volume {}", flat_shape))?;

    info!("Resampling {} -> {}", shape, flat_shape);
    let start = Instant::now();
    resample_into(
        curved.as_slice(),
        &positions,
        shape,
        flat.as_mut_slice(),
        &options,
    )
    .context("Resampling failed")?;
    let elapsed = start.elapsed();

    let stats = ColumnStats::from_positions(&positions, shape.columns);
    info!(
        "Resampled in {:.2} ms ({} left clamp, {} right clamp, {} interpolated)",
        elapsed.as_secs_f64() * 1000.0,
        stats.clamped_left,
        stats.clamped_right,
        stats.interpolated
    );

    io::write_volume(&args.output, &flat)?;

    if write_report {
        let report = RunReport::new(shape, positions.len(), stats, &options, elapsed);
        report.save(&args.output.with_extension("json"))?;
    }

    Ok(())
}
