use std::path::Path;

use anyhow::{Context, Result};
use fitconf::{ConfigSources, FitConfig};
use octave_fit::{FitReport, Instrument, Refinement, ShiftMode};
use owo_colors::{OwoColorize, Stream::Stdout};
use pitch_range::{read_tracks_from_path, summarize, transpose_midi, NoteTrack};
use serde::Serialize;
use tracing::info;

use crate::context::FitContext;

fn load_tracks(midi: &Path) -> Result<Vec<NoteTrack>> {
    read_tracks_from_path(midi).with_context(|| format!("reading notes from {}", midi.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn summary(midi: &Path, json: bool) -> Result<()> {
    let tracks = load_tracks(midi)?;
    let summary = summarize(&tracks);

    if json {
        return print_json(&summary);
    }

    let drum_tracks = tracks.iter().filter(|t| t.is_drum).count();
    println!(
        "{}: {} tracks ({} drum)",
        midi.display().if_supports_color(Stdout, |t| t.bold()),
        tracks.len(),
        drum_tracks
    );

    match summary {
        Some(s) => {
            println!("  pitched notes: {}", s.count);
            println!("  min:    {}", s.min);
            println!("  max:    {}", s.max);
            println!("  mean:   {:.2}", s.mean);
            println!("  median: {}", s.median);
        }
        None => println!("  no pitched notes"),
    }

    Ok(())
}

pub fn offset(ctx: &FitContext, midi: &Path, json: bool) -> Result<()> {
    let tracks = load_tracks(midi)?;
    let report = ctx.fitter.fit(&tracks, ctx.instrument);

    if json {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &FitReport) {
    println!(
        "{} ({} table, {})",
        report.instrument.if_supports_color(Stdout, |t| t.bold()),
        report.table,
        report.range
    );

    match (&report.summary, &report.trace) {
        (Some(summary), Some(trace)) => {
            println!(
                "  notes:          {} pitched, min {}, max {}, mean {:.2}, median {}",
                summary.count, summary.min, summary.max, summary.mean, summary.median
            );
            println!(
                "  center:         {:.1}, raw offset {:+.1} → {} octave(s)",
                trace.target_center, trace.raw_offset, trace.octaves
            );
            println!(
                "  shifted median: {} ({} from min, {} from max)",
                trace.shifted_median, trace.dist_min, trace.dist_max
            );
            let refinement = match trace.refinement {
                Refinement::None => "none",
                Refinement::UpOctave => "up one octave",
                Refinement::DownOctave => "down one octave",
            };
            println!("  refinement:     {}", refinement);
        }
        _ => println!("  no pitched notes, nothing to shift"),
    }

    println!(
        "offset: {}",
        report
            .offset
            .semitones()
            .if_supports_color(Stdout, |t| t.bright_green())
    );
}

#[derive(Serialize)]
struct InstrumentRow {
    instrument: Instrument,
    synthesis_id: u8,
    min: u8,
    max: u8,
    center: f64,
}

pub fn instruments(ctx: &FitContext, json: bool) -> Result<()> {
    let table = ctx.fitter.table();
    let rows: Vec<InstrumentRow> = table
        .iter()
        .map(|(instrument, range)| InstrumentRow {
            instrument,
            synthesis_id: instrument.synthesis_id(),
            min: range.min,
            max: range.max,
            center: range.center(),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    println!("{} table", table.kind());
    for row in rows {
        println!(
            "  {:<12} {:>3}-{:<3}  center {:>5.1}",
            row.instrument.name(),
            row.min,
            row.max,
            row.center
        );
    }

    Ok(())
}

pub fn plan(
    ctx: &FitContext,
    midi: &Path,
    mode: ShiftMode,
    output_dir: Option<&Path>,
) -> Result<()> {
    let tracks = match mode {
        ShiftMode::Auto => load_tracks(midi)?,
        // Manual offsets never look at the notes
        ShiftMode::Manual(_) => Vec::new(),
    };

    let plan = ctx
        .fitter
        .plan_synthesis(&tracks, ctx.instrument, mode, midi, output_dir);
    info!(
        instrument = %plan.instrument,
        pitch_offset = plan.pitch_offset,
        output = %plan.output_path.display(),
        "synthesis plan ready"
    );

    print_json(&plan)
}

pub fn transpose(
    ctx: &FitContext,
    midi: &Path,
    output: &Path,
    pitch_offset: Option<i32>,
) -> Result<()> {
    let bytes =
        std::fs::read(midi).with_context(|| format!("reading {}", midi.display()))?;

    let semitones = match pitch_offset {
        Some(semitones) => semitones,
        None => {
            let tracks = pitch_range::read_tracks(&bytes)
                .with_context(|| format!("reading notes from {}", midi.display()))?;
            ctx.fitter.fit(&tracks, ctx.instrument).offset.semitones()
        }
    };

    let outcome = transpose_midi(&bytes, semitones)
        .with_context(|| format!("transposing {}", midi.display()))?;
    std::fs::write(output, &outcome.bytes)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "wrote {} (offset {:+}, {} notes shifted, {} clamped)",
        output.display(),
        semitones,
        outcome.shifted,
        outcome.clamped
    );

    Ok(())
}

pub fn show_config(config: &FitConfig, sources: &ConfigSources) {
    if sources.files.is_empty() {
        println!("# no config files found, using defaults");
    }
    for file in &sources.files {
        println!("# loaded {}", file.display());
    }
    for var in &sources.env_overrides {
        println!("# overridden by ${}", var);
    }
    println!();
    print!("{}", config.to_toml());
}
