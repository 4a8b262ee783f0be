//! Replay recorded detections through a rally session and print statistics.
//!
//! cargo run --bin rallytrack -- --detections match.json --max-frames 60

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rallytrack_rs::{Association, FrameOutcome, ReplaySource, SessionConfig, SessionPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rallytrack", about = "Player and ball statistics from recorded detections")]
struct Args {
    /// Recorded detections (JSON, one entry per video frame)
    #[arg(long, value_name = "PATH")]
    detections: PathBuf,
    /// Session configuration (YAML); flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Analyze every Nth frame
    #[arg(long)]
    stride: Option<u32>,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
    /// Player matching radius in pixels
    #[arg(long)]
    gate: Option<f64>,
    /// Use one-to-one assignment instead of greedy nearest neighbour
    #[arg(long)]
    optimal: bool,
    /// Write statistics JSON here instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rallytrack=info,rallytrack_rs=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(stride) = args.stride {
        config.frame_stride = stride;
    }
    if let Some(max_frames) = args.max_frames {
        config.max_frames = Some(max_frames);
    }
    if let Some(gate) = args.gate {
        config.gating_radius_px = gate;
    }
    if args.optimal {
        config.association = Association::Optimal;
    }

    let source = ReplaySource::load(&args.detections)
        .with_context(|| format!("loading detections {}", args.detections.display()))?;
    let frame_count = source.len();
    let video = source.video();
    info!(
        "Replaying {} frames ({}x{} @ {} fps)",
        frame_count, video.width, video.height, video.fps
    );

    let mut pipeline =
        SessionPipeline::new(source, config, video).context("invalid session setup")?;

    for _ in 0..frame_count {
        if let FrameOutcome::StreamEnded = pipeline.process_frame(&[]) {
            break;
        }
    }

    let stats = pipeline.finish();
    let json = stats.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("Statistics saved to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
