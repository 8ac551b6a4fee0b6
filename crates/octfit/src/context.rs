use anyhow::{Context, Result};
use fitconf::FitConfig;
use octave_fit::{Instrument, InstrumentRange, OctaveFitter, RangeTable, ShiftMode, TableKind};
use tracing::debug;

/// Instrument and range table resolved from flags and configuration.
pub struct FitContext {
    pub instrument: Instrument,
    pub fitter: OctaveFitter,
}

impl FitContext {
    /// Command-line values win over configured defaults. Unknown instrument
    /// names fail here, before any file is read.
    pub fn resolve(config: &FitConfig, instrument: Option<&str>, extended: bool) -> Result<Self> {
        let name = instrument.unwrap_or(&config.defaults.instrument);
        let instrument: Instrument = name
            .parse()
            .with_context(|| format!("expected one of: {}", instrument_names()))?;

        let kind = if extended {
            TableKind::Extended
        } else {
            config
                .defaults
                .table
                .parse()
                .context("reading defaults.table")?
        };

        let table = range_table(config, kind)?;
        Ok(Self {
            instrument,
            fitter: OctaveFitter::with_table(table),
        })
    }
}

/// The selected table with configured `[ranges.*]` overrides applied.
pub fn range_table(config: &FitConfig, kind: TableKind) -> Result<RangeTable> {
    let mut table = RangeTable::of(kind).clone();

    for (name, bounds) in &config.ranges {
        let instrument: Instrument = name
            .parse()
            .with_context(|| format!("in [ranges.{}]", name))?;
        let range = InstrumentRange::new(bounds.min, bounds.max)
            .with_context(|| format!("in [ranges.{}]", name))?;

        debug!(%instrument, %range, "range override");
        table = table.with_override(instrument, range);
    }

    Ok(table)
}

/// An explicit `--auto-octave-shift` beats `--pitch-offset`, which beats config.
pub fn shift_mode(config: &FitConfig, auto_flag: bool, pitch_offset: Option<i32>) -> ShiftMode {
    if auto_flag {
        return ShiftMode::Auto;
    }
    match pitch_offset {
        Some(semitones) => ShiftMode::Manual(semitones),
        None if config.defaults.auto_octave_shift => ShiftMode::Auto,
        None => ShiftMode::Manual(config.defaults.pitch_offset),
    }
}

fn instrument_names() -> String {
    Instrument::ALL
        .iter()
        .map(|i| i.name())
        .collect::<Vec<_>>()
        .join(", ")
}
