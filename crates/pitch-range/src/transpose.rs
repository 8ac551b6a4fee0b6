use crate::note::DRUM_CHANNEL;
use crate::{Error, Result};
use midly::num::u7;
use midly::{MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of rewriting a MIDI file by a fixed number of semitones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransposeOutcome {
    /// Re-encoded Standard MIDI File.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Sounding note-ons that were moved.
    pub shifted: usize,
    /// Sounding note-ons whose target key fell outside 0..=127 and was clamped.
    pub clamped: usize,
}

/// Shift every keyed event on a non-drum channel by `semitones`.
///
/// Note on/off and polyphonic aftertouch keys move together so that
/// note-offs still match their note-ons. Keys are clamped to the MIDI
/// range; drum channel events and everything else pass through unchanged.
pub fn transpose_midi(midi_bytes: &[u8], semitones: i32) -> Result<TransposeOutcome> {
    let mut smf = Smf::parse(midi_bytes).map_err(|e| Error::MidiParse(e.to_string()))?;

    let mut shifted = 0usize;
    let mut clamped = 0usize;

    for track in smf.tracks.iter_mut() {
        for event in track.iter_mut() {
            let TrackEventKind::Midi { channel, message } = &mut event.kind else {
                continue;
            };
            if channel.as_int() == DRUM_CHANNEL {
                continue;
            }

            let (key, sounding) = match message {
                MidiMessage::NoteOn { key, vel } => (key, vel.as_int() > 0),
                MidiMessage::NoteOff { key, .. } | MidiMessage::Aftertouch { key, .. } => {
                    (key, false)
                }
                _ => continue,
            };

            let target = key.as_int() as i32 + semitones;
            let clamped_target = target.clamp(0, 127);
            *key = u7::new(clamped_target as u8);

            if sounding {
                shifted += 1;
                if clamped_target != target {
                    clamped += 1;
                }
            }
        }
    }

    if clamped > 0 {
        warn!(clamped, semitones, "transposed notes clamped to MIDI key range");
    }
    debug!(shifted, semitones, "transposed MIDI notes");

    let mut bytes = Vec::with_capacity(midi_bytes.len());
    smf.write_std(&mut bytes)
        .map_err(|e| Error::MidiWrite(e.to_string()))?;

    Ok(TransposeOutcome {
        bytes,
        shifted,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::read_tracks;
    use crate::testing::{smf, TrackBuilder};
    use pretty_assertions::assert_eq;

    fn song() -> Vec<u8> {
        let melody = TrackBuilder::new()
            .note(0, 60, 480)
            .note(0, 67, 480)
            .build();
        let drums = TrackBuilder::new().note(9, 36, 480).build();
        smf(&[melody, drums])
    }

    #[test]
    fn shifts_melody_not_drums() {
        let outcome = transpose_midi(&song(), -12).unwrap();
        assert_eq!(outcome.shifted, 2);
        assert_eq!(outcome.clamped, 0);

        let tracks = read_tracks(&outcome.bytes).unwrap();
        assert_eq!(tracks[0].pitches().collect::<Vec<_>>(), vec![48, 55]);
        assert_eq!(tracks[0].notes[0].duration_ticks(), 480);
        assert_eq!(tracks[1].pitches().collect::<Vec<_>>(), vec![36]);
    }

    #[test]
    fn clamps_at_top_of_range() {
        let outcome = transpose_midi(&song(), 64).unwrap();
        assert_eq!(outcome.clamped, 1);

        let tracks = read_tracks(&outcome.bytes).unwrap();
        assert_eq!(tracks[0].pitches().collect::<Vec<_>>(), vec![124, 127]);
    }

    #[test]
    fn zero_offset_preserves_notes() {
        let original = read_tracks(&song()).unwrap();
        let outcome = transpose_midi(&song(), 0).unwrap();
        assert_eq!(read_tracks(&outcome.bytes).unwrap(), original);
        assert_eq!(outcome.clamped, 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            transpose_midi(b"MThd", 12),
            Err(Error::MidiParse(_))
        ));
    }
}
