//! octfit - choose octave transpositions that fit MIDI files to instrument ranges.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitconf::FitConfig;
use tracing::debug;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "octfit")]
#[command(about = "Fit MIDI note ranges to instrument registers by whole octaves", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of ./octfit.toml
    #[arg(long, global = true, env = "OCTFIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pitch statistics of the pitched (non-drum) notes
    Summary {
        /// MIDI file to analyze
        midi: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compute the octave offset for an instrument
    Offset {
        /// MIDI file to analyze
        midi: PathBuf,

        /// Target instrument (defaults to the configured one)
        #[arg(short, long)]
        instrument: Option<String>,

        /// Use the extended range table
        #[arg(long)]
        extended: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List instrument ranges
    Instruments {
        /// Use the extended range table
        #[arg(long)]
        extended: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the synthesis hand-off for a MIDI file as JSON
    Plan {
        /// MIDI file to synthesize
        midi: PathBuf,

        /// Target instrument (defaults to the configured one)
        #[arg(short, long)]
        instrument: Option<String>,

        /// Use the extended range table
        #[arg(long)]
        extended: bool,

        /// Fit the offset to the instrument range; overrides --pitch-offset
        #[arg(long)]
        auto_octave_shift: bool,

        /// Fixed pitch offset in semitones
        #[arg(long, allow_hyphen_values = true)]
        pitch_offset: Option<i32>,

        /// Directory for the rendered audio
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Write a transposed copy of a MIDI file
    Transpose {
        /// MIDI file to transpose
        midi: PathBuf,

        /// Where to write the transposed file
        #[arg(short, long)]
        output: PathBuf,

        /// Target instrument (defaults to the configured one)
        #[arg(short, long)]
        instrument: Option<String>,

        /// Use the extended range table
        #[arg(long)]
        extended: bool,

        /// Fixed pitch offset in semitones instead of fitting
        #[arg(long, allow_hyphen_values = true)]
        pitch_offset: Option<i32>,
    },

    /// Show the effective configuration and where it came from
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = FitConfig::load_with_sources_from(cli.config.as_deref())
        .context("loading configuration")?;

    init_tracing(&config.telemetry.log_level);
    debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    match cli.command {
        Commands::Summary { midi, json } => {
            commands::summary(&midi, json)?;
        }
        Commands::Offset {
            midi,
            instrument,
            extended,
            json,
        } => {
            let ctx = context::FitContext::resolve(&config, instrument.as_deref(), extended)?;
            commands::offset(&ctx, &midi, json)?;
        }
        Commands::Instruments { extended, json } => {
            let ctx = context::FitContext::resolve(&config, None, extended)?;
            commands::instruments(&ctx, json)?;
        }
        Commands::Plan {
            midi,
            instrument,
            extended,
            auto_octave_shift,
            pitch_offset,
            output_dir,
        } => {
            let ctx = context::FitContext::resolve(&config, instrument.as_deref(), extended)?;
            let mode = context::shift_mode(&config, auto_octave_shift, pitch_offset);
            let output_dir = output_dir.or_else(|| config.output.dir.clone());
            commands::plan(&ctx, &midi, mode, output_dir.as_deref())?;
        }
        Commands::Transpose {
            midi,
            output,
            instrument,
            extended,
            pitch_offset,
        } => {
            let ctx = context::FitContext::resolve(&config, instrument.as_deref(), extended)?;
            commands::transpose(&ctx, &midi, &output, pitch_offset)?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
