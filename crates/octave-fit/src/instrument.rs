//! Registered playable pitch ranges for the supported instruments.
//!
//! Two tables cover the same fourteen instruments: `Standard` holds the
//! comfortable register and is what the default fit uses, `Extended` widens
//! most ranges for callers that want more latitude. Both are built once and
//! never change for the life of the process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Violin,
    Viola,
    Cello,
    DoubleBass,
    Flute,
    Oboe,
    Clarinet,
    Saxophone,
    Bassoon,
    Trumpet,
    Horn,
    Trombone,
    Tuba,
    Guitar,
}

impl Instrument {
    pub const ALL: [Instrument; 14] = [
        Instrument::Violin,
        Instrument::Viola,
        Instrument::Cello,
        Instrument::DoubleBass,
        Instrument::Flute,
        Instrument::Oboe,
        Instrument::Clarinet,
        Instrument::Saxophone,
        Instrument::Bassoon,
        Instrument::Trumpet,
        Instrument::Horn,
        Instrument::Trombone,
        Instrument::Tuba,
        Instrument::Guitar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Violin => "violin",
            Instrument::Viola => "viola",
            Instrument::Cello => "cello",
            Instrument::DoubleBass => "double_bass",
            Instrument::Flute => "flute",
            Instrument::Oboe => "oboe",
            Instrument::Clarinet => "clarinet",
            Instrument::Saxophone => "saxophone",
            Instrument::Bassoon => "bassoon",
            Instrument::Trumpet => "trumpet",
            Instrument::Horn => "horn",
            Instrument::Trombone => "trombone",
            Instrument::Tuba => "tuba",
            Instrument::Guitar => "guitar",
        }
    }

    /// Instrument id used by the synthesis model's conditioning input.
    pub fn synthesis_id(&self) -> u8 {
        *self as u8
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Instrument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Instrument::ALL
            .into_iter()
            .find(|i| i.name() == normalized)
            .ok_or_else(|| Error::UnknownInstrument(s.to_string()))
    }
}

/// Inclusive MIDI pitch bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRange {
    pub min: u8,
    pub max: u8,
}

impl InstrumentRange {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        if min > max || max > 127 {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Midpoint of the range, not truncated.
    pub fn center(&self) -> f64 {
        (self.max as f64 + self.min as f64) / 2.0
    }

    pub fn contains(&self, pitch: i32) -> bool {
        (self.min as i32..=self.max as i32).contains(&pitch)
    }
}

impl fmt::Display for InstrumentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    #[default]
    Standard,
    Extended,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Standard => write!(f, "standard"),
            TableKind::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for TableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(TableKind::Standard),
            "extended" => Ok(TableKind::Extended),
            _ => Err(Error::UnknownTable(s.to_string())),
        }
    }
}

/// Total mapping from every [`Instrument`] to its range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTable {
    kind: TableKind,
    entries: [InstrumentRange; 14],
}

const fn r(min: u8, max: u8) -> InstrumentRange {
    InstrumentRange { min, max }
}

static STANDARD: RangeTable = RangeTable {
    kind: TableKind::Standard,
    entries: [
        r(55, 100), // violin: G3 to E7
        r(48, 93),  // viola: C3 to A6
        r(36, 84),  // cello: C2 to C6
        r(28, 67),  // double bass: E1 to G4
        r(60, 98),  // flute: C4 to D7
        r(58, 91),  // oboe: Bb3 to G6
        r(50, 91),  // clarinet: D3 to G6
        r(49, 80),  // alto sax: Db3 to Ab5
        r(34, 76),  // bassoon: Bb1 to E5
        r(54, 86),  // trumpet: F#3 to D6
        r(36, 77),  // horn: C2 to F5
        r(40, 82),  // trombone: E2 to Bb5
        r(26, 65),  // tuba: D1 to F4
        r(40, 88),  // guitar: E2 to E6
    ],
};

static EXTENDED: RangeTable = RangeTable {
    kind: TableKind::Extended,
    entries: [
        r(55, 105), // violin: G3 to A7
        r(48, 96),  // viola: C3 to C7
        r(36, 88),  // cello: C2 to E6
        r(24, 71),  // double bass: C1 to B4
        r(59, 101), // flute: B3 to F7
        r(57, 96),  // oboe: A3 to C7
        r(50, 94),  // clarinet: D3 to Bb6
        r(46, 85),  // alto sax: Bb2 to Db6
        r(34, 79),  // bassoon: Bb1 to G5
        r(52, 89),  // trumpet: E3 to F6
        r(35, 79),  // horn: B1 to G5
        r(40, 86),  // trombone: E2 to D6
        r(24, 67),  // tuba: C1 to G4
        r(40, 95),  // guitar: E2 to B6
    ],
};

impl RangeTable {
    pub fn standard() -> &'static RangeTable {
        &STANDARD
    }

    pub fn extended() -> &'static RangeTable {
        &EXTENDED
    }

    pub fn of(kind: TableKind) -> &'static RangeTable {
        match kind {
            TableKind::Standard => Self::standard(),
            TableKind::Extended => Self::extended(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn range(&self, instrument: Instrument) -> InstrumentRange {
        self.entries[instrument.index()]
    }

    /// Resolve an instrument name against this table.
    pub fn lookup(&self, name: &str) -> Result<(Instrument, InstrumentRange)> {
        let instrument: Instrument = name.parse()?;
        Ok((instrument, self.range(instrument)))
    }

    /// Copy of this table with one entry replaced.
    pub fn with_override(&self, instrument: Instrument, range: InstrumentRange) -> RangeTable {
        let mut table = self.clone();
        table.entries[instrument.index()] = range;
        table
    }

    pub fn iter(&self) -> impl Iterator<Item = (Instrument, InstrumentRange)> + '_ {
        Instrument::ALL.into_iter().map(|i| (i, self.range(i)))
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}
