// cropwise-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Cropwise: interlace and crop detection for video sources",
    long_about = "Probes a video source with ffmpeg for interlacing and black borders and \
                  resolves the encode parameters (crop, scale, deinterlace, subtitles) via cropwise-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists the video and subtitle tracks of a source
    Tracks(TracksArgs),
    /// Runs interlace and crop detection and prints the resolved parameters
    Detect(DetectArgs),
}

#[derive(Args, Debug)]
pub struct TracksArgs {
    /// Source video file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT")]
    pub input_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Source video file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Video track to analyze and encode
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    pub track: usize,

    /// Position in seconds where analysis starts
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub start: f64,

    // --- Detection Toggles ---
    /// Skip crop detection
    #[arg(long)]
    pub no_crop: bool,

    /// Skip interlace detection
    #[arg(long)]
    pub no_interlace: bool,

    // --- Manual Parameters ---
    /// Output width; leave unset to let the encoder derive it
    #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
    pub scale_width: Option<u32>,

    /// Output height; leave unset to let the encoder derive it
    #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
    pub scale_height: Option<u32>,

    /// Correct non-square pixels when scaling (only applies to anamorphic tracks)
    #[arg(long)]
    pub fix_sar: bool,

    // --- Subtitles ---
    /// External subtitle file added after the embedded tracks
    #[arg(long, value_name = "PATH")]
    pub subtitle: Option<PathBuf>,

    /// Subtitle track list index to select (the external file comes last)
    #[arg(long, value_name = "INDEX")]
    pub subtitle_track: Option<usize>,

    /// Burn the selected subtitle track into the video
    #[arg(long)]
    pub burn_subs: bool,

    // --- Configuration / Output ---
    /// JSON file with detection settings
    #[arg(long, value_name = "FILE", env = "CROPWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the resolved parameters as JSON
    #[arg(long)]
    pub json: bool,
}
