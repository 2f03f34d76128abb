//! `rmc-plan <curves.txt> <spool.bin> [--config calibration.toml]`
//!
//! Runs the motion pipeline end to end and writes the result as a spool of
//! packed V02 frames, ready for `rmc-send` to stream to the controller.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;

use rmc_host::config::Config;
use rmc_host::pipeline;
use rmc_host::spool::SpoolWriter;
use rmc_host::tracing_support::{self, prelude::*};

#[derive(Parser, Debug)]
#[command(about = "Plan a tool-path file into a spool of motor-controller frames")]
struct Args {
    /// Tool-path text file (`T;x0,y0,x1,y1,...` per line).
    curves: PathBuf,

    /// Output spool file.
    spool: PathBuf,

    /// TOML calibration/config file; falls back to defaults if omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> rmc_host::Result<()> {
    let config = match args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let file = File::open(&args.curves)?;
    let frames = pipeline::plan(
        BufReader::new(file),
        &config.calibration,
        config.sample_increment_in,
    )?;
    info!(count = frames.len(), "planned frames");

    let mut writer = SpoolWriter::create(&args.spool)?;
    for frame in &frames {
        writer.append(frame)?;
    }
    writer.flush()?;
    info!(path = %args.spool.display(), "spool written");
    Ok(())
}

fn main() {
    tracing_support::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        error!(error = %err, "rmc-plan failed");
        std::process::exit(1);
    }
}
