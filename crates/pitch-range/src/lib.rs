pub mod note;
pub mod source;
pub mod summary;
pub mod transpose;

#[cfg(test)]
pub(crate) mod testing;

pub use note::{Note, NoteTrack, DRUM_CHANNEL};
pub use source::{read_tracks, read_tracks_from_path};
pub use summary::{summarize, summarize_pitches, PitchRangeSummary};
pub use transpose::{transpose_midi, TransposeOutcome};

use std::path::PathBuf;

/// Errors from reading or rewriting MIDI note sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    MidiParse(String),

    #[error("MIDI write error: {0}")]
    MidiWrite(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
