//! Hex dissector for spool files and raw serial captures of the
//! drawing-robot link protocol.
//!
//! Feeds captured bytes through the same [`rmc_host::frame::InboundFrameCodec`]
//! / [`rmc_host::frame::FrameV02::unpack`] machinery the driver itself uses,
//! so a dissection can never silently diverge from what the link sender and
//! receiver actually do with the same bytes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::BytesMut;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tokio_util::codec::Decoder;

use rmc_host::frame::{FrameV02, InboundFrameCodec, ReceiverEvent, V02_SIZE};
use rmc_host::link::dispatcher::{describe, DispatchedEvent};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Direction {
    /// Host to controller: a spool of packed V02 motion frames.
    Outbound,
    /// Controller to host: a raw capture of V01 ack/event frames.
    Inbound,
}

#[derive(Parser, Debug)]
#[command(about = "Dissect a spool file or serial capture of the drawing-robot link protocol")]
struct Args {
    /// File to dissect.
    path: PathBuf,

    /// Which side of the link the bytes came from.
    #[arg(long, value_enum, default_value_t = Direction::Outbound)]
    direction: Direction,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let bytes = fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;

    match args.direction {
        Direction::Outbound => dissect_outbound(&bytes),
        Direction::Inbound => dissect_inbound(&bytes),
    }
    Ok(())
}

fn dissect_outbound(bytes: &[u8]) {
    if bytes.len() % V02_SIZE != 0 {
        eprintln!(
            "{}",
            format!(
                "warning: {} bytes is not a multiple of the {}-byte V02 frame size",
                bytes.len(),
                V02_SIZE
            )
            .yellow()
        );
    }

    for (index, chunk) in bytes.chunks(V02_SIZE).enumerate() {
        if chunk.len() < V02_SIZE {
            println!("{}", format!("[{index:04}] trailing {} bytes, ignored", chunk.len()).red());
            break;
        }
        match FrameV02::unpack(chunk) {
            Ok(frame) => println!(
                "[{index:04}] {} code={} theta1={} theta2={} d3={} {}",
                "V02".green().bold(),
                frame.code,
                frame.theta1,
                frame.theta2,
                frame.d3,
                hex::encode(chunk).dimmed(),
            ),
            Err(err) => println!(
                "[{index:04}] {} {} {}",
                "BAD".red().bold(),
                err,
                hex::encode(chunk).dimmed(),
            ),
        }
    }
}

fn dissect_inbound(bytes: &[u8]) {
    let mut codec = InboundFrameCodec::default();
    let mut buf = BytesMut::from(bytes);
    let mut index = 0usize;

    while let Ok(Some(event)) = codec.decode(&mut buf) {
        match event {
            ReceiverEvent::Frame(frame) => {
                let dispatched = DispatchedEvent::from_code(frame.code);
                let (title, _severity, footnote) = describe(dispatched);
                println!(
                    "[{index:04}] {} code={} {} — {}",
                    "V01".green().bold(),
                    frame.code,
                    title.bold(),
                    footnote.dimmed(),
                );
            }
            ReceiverEvent::BadVersion(byte) => {
                println!("[{index:04}] {} byte={byte:#04x}", "BADVER".yellow());
            }
            ReceiverEvent::FrameCorrupt => {
                println!("[{index:04}] {}", "CORRUPT".red().bold());
            }
        }
        index += 1;
    }
}
