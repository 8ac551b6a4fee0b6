//! Octave-aligned transposition of note collections into instrument ranges.
//!
//! Summarizes the pitched notes of a collection (see [`pitch_range`]), then
//! picks the whole-octave shift that centers the collection's median inside
//! a target instrument's registered range.
//!
//! ```rust
//! use octave_fit::{Instrument, OctaveFitter};
//! use pitch_range::NoteTrack;
//!
//! let tracks = vec![NoteTrack::from_pitches(false, [67, 72, 76])];
//! let report = OctaveFitter::new().fit(&tracks, Instrument::Cello);
//! assert_eq!(report.offset.semitones(), -12);
//! ```

pub mod fit;
pub mod instrument;
pub mod offset;

pub use fit::{FitReport, OctaveFitter, ShiftMode, SynthesisPlan};
pub use instrument::{Instrument, InstrumentRange, RangeTable, TableKind};
pub use offset::{
    explain_offset, offset_or_zero, optimal_offset, OffsetTrace, PitchOffset, Refinement,
};

/// Errors from instrument lookup and fitting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("unknown range table '{0}' (expected 'standard' or 'extended')")]
    UnknownTable(String),

    #[error("invalid pitch range {min}-{max}")]
    InvalidRange { min: u8, max: u8 },

    #[error(transparent)]
    Source(#[from] pitch_range::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
