//! Octave-quantized transposition of a note collection into an instrument range.
//!
//! The fit works on aggregate statistics only. The collection's median is
//! aligned to the center of the target range in whole octaves, then nudged by
//! at most one more octave when it ends up crowding one edge of the range:
//!
//! 1. `octaves = round_ties_even((center - median) / 12)`
//! 2. `shifted = median + 12 * octaves`
//! 3. Shift one octave up when `shifted` is more than twice as close to the
//!    bottom as to the top and `shifted + 12` still fits; symmetrically down.
//!
//! Individual notes are never checked against the range, so some may still
//! fall outside it after the shift.

use std::fmt;

use pitch_range::PitchRangeSummary;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::instrument::InstrumentRange;

pub const OCTAVE: i32 = 12;

/// Signed transposition in semitones, always a whole number of octaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchOffset(i32);

impl PitchOffset {
    pub const ZERO: PitchOffset = PitchOffset(0);

    pub fn from_octaves(octaves: i32) -> Self {
        PitchOffset(octaves * OCTAVE)
    }

    pub fn semitones(&self) -> i32 {
        self.0
    }

    pub fn octaves(&self) -> i32 {
        self.0 / OCTAVE
    }
}

impl fmt::Display for PitchOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl From<PitchOffset> for i32 {
    fn from(offset: PitchOffset) -> Self {
        offset.0
    }
}

/// One-octave correction applied after coarse alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    None,
    UpOctave,
    DownOctave,
}

/// Every intermediate value of one offset computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetTrace {
    pub median: u8,
    pub target: InstrumentRange,
    pub target_center: f64,
    pub raw_offset: f64,
    pub octaves: i32,
    pub coarse_offset: PitchOffset,
    pub shifted_median: i32,
    pub dist_min: i32,
    pub dist_max: i32,
    pub refinement: Refinement,
    pub offset: PitchOffset,
}

/// Compute the octave shift that centers `summary` inside `target`.
pub fn optimal_offset(summary: &PitchRangeSummary, target: InstrumentRange) -> PitchOffset {
    explain_offset(summary, target).offset
}

/// Absent summaries carry no information, so they get no shift.
pub fn offset_or_zero(summary: Option<&PitchRangeSummary>, target: InstrumentRange) -> PitchOffset {
    match summary {
        Some(summary) => optimal_offset(summary, target),
        None => {
            debug!("no pitched notes, using zero offset");
            PitchOffset::ZERO
        }
    }
}

/// Same as [`optimal_offset`] but keeps the intermediate values.
pub fn explain_offset(summary: &PitchRangeSummary, target: InstrumentRange) -> OffsetTrace {
    let median = summary.median as i32;
    let target_center = target.center();
    let raw_offset = target_center - median as f64;

    // Ties go to the even octave count: -0.5 → 0, 0.5 → 0, 1.5 → 2
    let octaves = (raw_offset / OCTAVE as f64).round_ties_even() as i32;
    let coarse_offset = PitchOffset::from_octaves(octaves);

    let shifted_median = median + coarse_offset.semitones();
    let dist_min = (shifted_median - target.min as i32).abs();
    let dist_max = (shifted_median - target.max as i32).abs();

    let refinement = if (dist_min as f64) < dist_max as f64 * 0.5
        && shifted_median + OCTAVE <= target.max as i32
    {
        Refinement::UpOctave
    } else if (dist_max as f64) < dist_min as f64 * 0.5
        && shifted_median - OCTAVE >= target.min as i32
    {
        Refinement::DownOctave
    } else {
        Refinement::None
    };

    let offset = match refinement {
        Refinement::None => coarse_offset,
        Refinement::UpOctave => PitchOffset::from_octaves(octaves + 1),
        Refinement::DownOctave => PitchOffset::from_octaves(octaves - 1),
    };

    debug!(
        median,
        %target,
        target_center,
        raw_offset,
        coarse = coarse_offset.semitones(),
        shifted_median,
        dist_min,
        dist_max,
        ?refinement,
        offset = offset.semitones(),
        "computed octave offset"
    );

    OffsetTrace {
        median: summary.median,
        target,
        target_center,
        raw_offset,
        octaves,
        coarse_offset,
        shifted_median,
        dist_min,
        dist_max,
        refinement,
        offset,
    }
}
