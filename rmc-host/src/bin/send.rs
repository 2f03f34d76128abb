//! `rmc-send <spool.bin> [--config calibration.toml] [--device PATH]`
//!
//! Streams a spool of packed V02 frames to the motor controller over a
//! serial link, driving the stop-and-wait handshake in [`rmc_host::link`].

use std::path::PathBuf;

use clap::Parser;
use tokio_serial::SerialPortBuilderExt;

use rmc_host::config::Config;
use rmc_host::error::RmcError;
use rmc_host::link;
use rmc_host::notify::LoggingNotifier;
use rmc_host::spool::SpoolReader;
use rmc_host::tracing_support::{self, prelude::*};

#[derive(Parser, Debug)]
#[command(about = "Stream a spool of motor-controller frames over a serial link")]
struct Args {
    /// Spool file produced by `rmc-plan`.
    spool: PathBuf,

    /// TOML calibration/config file; falls back to defaults if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device path. Overrides the config file's `device` field.
    #[arg(long)]
    device: Option<String>,
}

async fn run(args: Args) -> rmc_host::Result<()> {
    let config = match args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let device = args
        .device
        .or(config.device.clone())
        .ok_or_else(|| RmcError::Config("no serial device given (--device or config)".to_string()))?;

    let reader = SpoolReader::open(&args.spool)?;
    let frames: Vec<_> = reader.collect::<Result<Vec<_>, _>>()?;
    info!(count = frames.len(), %device, "loaded spool");

    let port = tokio_serial::new(device.as_str(), config.baud)
        .open_native_async()
        .map_err(|e| RmcError::SerialIo(e.to_string()))?;
    let (port_reader, port_writer) = tokio::io::split(port);

    let notifier = LoggingNotifier;
    link::send_all(&frames, port_reader, port_writer, &notifier, config.resend_timeout()).await?;

    info!("all frames acknowledged");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_support::init();
    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!(error = %err, "rmc-send failed");
        std::process::exit(1);
    }
}
