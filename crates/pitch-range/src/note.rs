use serde::{Deserialize, Serialize};

/// Zero-based MIDI channel reserved for General MIDI percussion (channel 10).
pub const DRUM_CHANNEL: u8 = 9;

/// A single MIDI note with absolute tick timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub onset_tick: u64,
    pub offset_tick: u64,
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
}

impl Note {
    pub fn duration_ticks(&self) -> u64 {
        self.offset_tick.saturating_sub(self.onset_tick)
    }
}

/// Notes from one file track on one MIDI channel.
///
/// `is_drum` applies to the whole track, never to individual notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteTrack {
    pub track_index: usize,
    pub channel: u8,
    pub program: Option<u8>,
    pub name: Option<String>,
    pub is_drum: bool,
    pub notes: Vec<Note>,
}

impl NoteTrack {
    /// An empty track; drum status follows the channel.
    pub fn new(track_index: usize, channel: u8) -> Self {
        Self {
            track_index,
            channel,
            program: None,
            name: None,
            is_drum: channel == DRUM_CHANNEL,
            notes: Vec::new(),
        }
    }

    /// Build a track straight from pitch values, mostly useful for callers
    /// that hold notes from something other than a MIDI file.
    pub fn from_pitches(is_drum: bool, pitches: impl IntoIterator<Item = u8>) -> Self {
        let notes = pitches
            .into_iter()
            .enumerate()
            .map(|(i, pitch)| Note {
                onset_tick: i as u64,
                offset_tick: i as u64 + 1,
                pitch,
                velocity: 100,
                channel: if is_drum { DRUM_CHANNEL } else { 0 },
            })
            .collect();

        Self {
            is_drum,
            notes,
            ..Self::new(0, if is_drum { DRUM_CHANNEL } else { 0 })
        }
    }

    pub fn pitches(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes.iter().map(|n| n.pitch)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_nine_is_drum() {
        assert!(NoteTrack::new(1, 9).is_drum);
        assert!(!NoteTrack::new(1, 0).is_drum);
    }

    #[test]
    fn from_pitches_keeps_order() {
        let track = NoteTrack::from_pitches(false, [64, 60, 67]);
        assert_eq!(track.pitches().collect::<Vec<_>>(), vec![64, 60, 67]);
        assert_eq!(track.notes[1].duration_ticks(), 1);
    }
}
