use crate::note::NoteTrack;
use serde::{Deserialize, Serialize};

/// Pitch statistics over every pitched (non-drum) note of a collection.
///
/// There is no empty summary: a collection without pitched notes yields
/// `None` from [`summarize`] instead of a zero-filled record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRangeSummary {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
    /// Element at index `n / 2` of the ascending pitches. For an even count
    /// this is the upper of the two middle values, not their average.
    pub median: u8,
    /// Number of pitched notes the statistics were computed from.
    pub count: usize,
}

/// Summarize all notes on non-drum tracks.
pub fn summarize(tracks: &[NoteTrack]) -> Option<PitchRangeSummary> {
    summarize_pitches(
        tracks
            .iter()
            .filter(|t| !t.is_drum)
            .flat_map(|t| t.pitches()),
    )
}

/// Summarize a bare list of pitches. Input order does not matter.
pub fn summarize_pitches(pitches: impl IntoIterator<Item = u8>) -> Option<PitchRangeSummary> {
    let mut pitches: Vec<u8> = pitches.into_iter().collect();
    if pitches.is_empty() {
        return None;
    }

    pitches.sort_unstable();

    let count = pitches.len();
    let mean = pitches.iter().map(|&p| p as f64).sum::<f64>() / count as f64;

    Some(PitchRangeSummary {
        min: pitches[0],
        max: pitches[count - 1],
        mean,
        median: pitches[count / 2],
        count,
    })
}
