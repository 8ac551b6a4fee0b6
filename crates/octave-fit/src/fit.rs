use std::path::{Path, PathBuf};

use pitch_range::{read_tracks_from_path, summarize, NoteTrack, PitchRangeSummary};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::instrument::{Instrument, InstrumentRange, RangeTable, TableKind};
use crate::offset::{explain_offset, OffsetTrace, PitchOffset};
use crate::Result;

/// Outcome of fitting one note collection to one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub instrument: Instrument,
    pub table: TableKind,
    pub range: InstrumentRange,
    /// `None` when the collection holds no pitched notes.
    pub summary: Option<PitchRangeSummary>,
    pub trace: Option<OffsetTrace>,
    pub offset: PitchOffset,
}

/// Fits note collections against a range table.
///
/// Holds no per-call state, so a single fitter can be shared across threads
/// to process many files.
#[derive(Debug, Clone, Default)]
pub struct OctaveFitter {
    table: RangeTable,
}

impl OctaveFitter {
    /// Fitter over the standard range table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitter over an alternate table, e.g. the extended one or one with
    /// configured overrides.
    pub fn with_table(table: RangeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    pub fn fit(&self, tracks: &[NoteTrack], instrument: Instrument) -> FitReport {
        let range = self.table.range(instrument);
        let summary = summarize(tracks);
        let trace = summary.as_ref().map(|s| explain_offset(s, range));
        let offset = trace.as_ref().map_or(PitchOffset::ZERO, |t| t.offset);

        info!(
            %instrument,
            table = %self.table.kind(),
            %range,
            pitched_notes = summary.as_ref().map_or(0, |s| s.count),
            %offset,
            "fitted note collection"
        );

        FitReport {
            instrument,
            table: self.table.kind(),
            range,
            summary,
            trace,
            offset,
        }
    }

    /// Like [`fit`](Self::fit), resolving the instrument by name first.
    pub fn fit_named(&self, tracks: &[NoteTrack], name: &str) -> Result<FitReport> {
        let instrument: Instrument = name.parse()?;
        Ok(self.fit(tracks, instrument))
    }

    /// Read a MIDI file and fit its notes.
    pub fn fit_file(&self, path: &Path, instrument: Instrument) -> Result<FitReport> {
        let tracks = read_tracks_from_path(path)?;
        Ok(self.fit(&tracks, instrument))
    }
}

/// How the pitch offset handed to the synthesizer is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "semitones")]
pub enum ShiftMode {
    /// Octave fit against the instrument range.
    Auto,
    /// Caller-chosen semitones, passed through as is.
    Manual(i32),
}

/// Everything the synthesis stage needs to render one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisPlan {
    pub midi_file: PathBuf,
    pub instrument: Instrument,
    pub instrument_id: u8,
    pub pitch_offset: i32,
    pub output_path: PathBuf,
}

impl OctaveFitter {
    /// Decide the pitch offset and output location for synthesizing `midi_file`.
    ///
    /// In manual mode the note collection is not consulted. Output files are
    /// named `<stem>_<instrument>_<offset>.wav` inside `output_dir`, or the
    /// current directory when none is given. The stem is the file name up to
    /// its first dot.
    pub fn plan_synthesis(
        &self,
        tracks: &[NoteTrack],
        instrument: Instrument,
        mode: ShiftMode,
        midi_file: &Path,
        output_dir: Option<&Path>,
    ) -> SynthesisPlan {
        let pitch_offset = match mode {
            ShiftMode::Auto => self.fit(tracks, instrument).offset.semitones(),
            ShiftMode::Manual(semitones) => semitones,
        };

        // Everything before the first dot: "take.2.mid" names "take_..."
        let stem = midi_file
            .file_name()
            .map(|name| {
                let name = name.to_string_lossy();
                name.split('.').next().unwrap_or_default().to_string()
            })
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}_{}_{}.wav", stem, instrument, pitch_offset);
        let output_path = match output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        };

        SynthesisPlan {
            midi_file: midi_file.to_path_buf(),
            instrument,
            instrument_id: instrument.synthesis_id(),
            pitch_offset,
            output_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::Refinement;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn melody(pitches: &[u8]) -> Vec<NoteTrack> {
        vec![
            NoteTrack::from_pitches(false, pitches.iter().copied()),
            NoteTrack::from_pitches(true, [35, 38, 42, 42, 42]),
        ]
    }

    #[test]
    fn fit_cello_from_tracks() {
        let report = OctaveFitter::new().fit(&melody(&[67, 72, 76]), Instrument::Cello);
        assert_eq!(report.table, TableKind::Standard);
        assert_eq!(report.range, InstrumentRange { min: 36, max: 84 });
        assert_eq!(report.summary.as_ref().unwrap().median, 72);
        assert_eq!(report.trace.as_ref().unwrap().refinement, Refinement::None);
        assert_eq!(report.offset.semitones(), -12);
    }

    #[test]
    fn drums_only_gives_zero() {
        let tracks = vec![NoteTrack::from_pitches(true, [36, 38])];
        let report = OctaveFitter::new().fit(&tracks, Instrument::Tuba);
        assert_eq!(report.summary, None);
        assert_eq!(report.trace, None);
        assert_eq!(report.offset, PitchOffset::ZERO);
    }

    #[test]
    fn extended_table_can_change_the_answer() {
        // Median 84 against guitar: standard center 64 → -24, extended center 67.5 → -12
        let tracks = melody(&[84]);
        let standard = OctaveFitter::new().fit(&tracks, Instrument::Guitar);
        let extended = OctaveFitter::with_table(RangeTable::extended().clone())
            .fit(&tracks, Instrument::Guitar);

        assert_eq!(standard.offset.semitones(), -24);
        assert_eq!(extended.table, TableKind::Extended);
        assert_eq!(extended.offset.semitones(), -12);
    }

    #[test]
    fn fit_named_rejects_unknown() {
        let err = OctaveFitter::new()
            .fit_named(&melody(&[60]), "theremin")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownInstrument(_)));
    }

    #[test]
    fn plan_auto_names_output_after_offset() {
        let plan = OctaveFitter::new().plan_synthesis(
            &melody(&[48]),
            Instrument::Violin,
            ShiftMode::Auto,
            Path::new("songs/bach.mid"),
            Some(Path::new("renders")),
        );
        assert_eq!(plan.pitch_offset, 24);
        assert_eq!(plan.instrument_id, 0);
        assert_eq!(plan.output_path, PathBuf::from("renders/bach_violin_24.wav"));
    }

    #[test]
    fn plan_manual_passes_offset_through() {
        let plan = OctaveFitter::new().plan_synthesis(
            &melody(&[48]),
            Instrument::Flute,
            ShiftMode::Manual(-5),
            Path::new("tune.mid"),
            None,
        );
        assert_eq!(plan.pitch_offset, -5);
        assert_eq!(plan.instrument_id, 4);
        assert_eq!(plan.output_path, PathBuf::from("tune_flute_-5.wav"));
    }

    #[test]
    fn plan_stem_stops_at_first_dot() {
        let plan = OctaveFitter::new().plan_synthesis(
            &[],
            Instrument::Violin,
            ShiftMode::Manual(24),
            Path::new("takes/my.take.mid"),
            None,
        );
        assert_eq!(plan.output_path, PathBuf::from("my_violin_24.wav"));
        assert_eq!(plan.midi_file, PathBuf::from("takes/my.take.mid"));
    }

    #[test]
    fn plan_serializes_for_handoff() {
        let plan = OctaveFitter::new().plan_synthesis(
            &melody(&[72]),
            Instrument::Cello,
            ShiftMode::Auto,
            Path::new("a.mid"),
            None,
        );
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["instrument"], "cello");
        assert_eq!(json["instrument_id"], 2);
        assert_eq!(json["pitch_offset"], -12);
    }

    #[test]
    fn fit_file_surfaces_read_errors() {
        let err = OctaveFitter::new()
            .fit_file(Path::new("/nonexistent/tune.mid"), Instrument::Oboe)
            .unwrap_err();
        assert!(matches!(err, Error::Source(pitch_range::Error::Io { .. })));
    }

    #[test]
    fn fitter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OctaveFitter>();
    }
}
