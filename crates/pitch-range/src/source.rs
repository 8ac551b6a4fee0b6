use crate::note::{Note, NoteTrack};
use crate::{Error, Result};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Parse a Standard MIDI File and split its notes into tracks.
pub fn read_tracks(midi_bytes: &[u8]) -> Result<Vec<NoteTrack>> {
    let smf = Smf::parse(midi_bytes).map_err(|e| Error::MidiParse(e.to_string()))?;
    Ok(tracks_from_smf(&smf))
}

/// Read a MIDI file from disk and split its notes into tracks.
pub fn read_tracks_from_path(path: &Path) -> Result<Vec<NoteTrack>> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_tracks(&bytes)
}

/// Group notes by `(file track, channel)`, pairing note-on/note-off events.
///
/// Each file track can carry several channels; every channel becomes its own
/// `NoteTrack`, so a channel-10 part sharing a file track with a melody is
/// still recognized as percussion. Tracks without notes are dropped.
///
/// A note-off ends every open note of its key that started on an earlier
/// tick. Notes still open when the track ends never sounded to completion
/// and are left out, which also drops zero-length notes.
pub fn tracks_from_smf(smf: &Smf) -> Vec<NoteTrack> {
    let mut tracks = Vec::new();

    for (track_index, events) in smf.tracks.iter().enumerate() {
        let mut current_tick: u64 = 0;
        let mut name = None;
        let mut by_channel: BTreeMap<u8, NoteTrack> = BTreeMap::new();
        // Map (channel, pitch) → Vec<(onset_tick, velocity)> for stacking
        let mut pending: HashMap<(u8, u8), Vec<(u64, u8)>> = HashMap::new();

        for event in events {
            current_tick += event.delta.as_int() as u64;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                    name = String::from_utf8(bytes.to_vec()).ok();
                }
                TrackEventKind::Midi { channel, message } => {
                    let ch = channel.as_int();
                    match message {
                        MidiMessage::ProgramChange { program } => {
                            by_channel
                                .entry(ch)
                                .or_insert_with(|| NoteTrack::new(track_index, ch))
                                .program
                                .get_or_insert(program.as_int());
                        }
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            pending
                                .entry((ch, key.as_int()))
                                .or_default()
                                .push((current_tick, vel.as_int()));
                        }
                        MidiMessage::NoteOff { key, .. } | MidiMessage::NoteOn { key, .. } => {
                            // vel=0 NoteOn is NoteOff
                            let pitch = key.as_int();
                            let Some(stack) = pending.get_mut(&(ch, pitch)) else {
                                continue;
                            };
                            // Every open note of this key ends here, except ones that
                            // started on this very tick; those stay open.
                            let (same_tick, closing): (Vec<_>, Vec<_>) = stack
                                .drain(..)
                                .partition(|&(onset, _)| onset == current_tick);
                            *stack = same_tick;

                            let track = by_channel
                                .entry(ch)
                                .or_insert_with(|| NoteTrack::new(track_index, ch));
                            for (onset, velocity) in closing {
                                track.notes.push(Note {
                                    onset_tick: onset,
                                    offset_tick: current_tick,
                                    pitch,
                                    velocity,
                                    channel: ch,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let unterminated: usize = pending.values().map(Vec::len).sum();
        if unterminated > 0 {
            debug!(track_index, unterminated, "dropping notes without a note-off");
        }

        for (_, mut track) in by_channel {
            if track.is_empty() {
                continue;
            }
            // Sort by onset, then pitch for determinism
            track
                .notes
                .sort_by(|a, b| a.onset_tick.cmp(&b.onset_tick).then(a.pitch.cmp(&b.pitch)));
            track.name = name.clone();
            tracks.push(track);
        }
    }

    debug!(
        file_tracks = smf.tracks.len(),
        note_tracks = tracks.len(),
        drum_tracks = tracks.iter().filter(|t| t.is_drum).count(),
        "extracted note tracks"
    );

    tracks
}
