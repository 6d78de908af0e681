//! Note classification.
//!
//! Partitions MIDI note numbers into the seven natural pitch classes by
//! residue modulo 12. Sharps and flats have no lane on the strip and
//! classify to `None`; the event that carried them produces no visual
//! change.

use crate::{KeylightError, Result};

/// Number of lanes on the indicator strip.
pub const LANE_COUNT: usize = 7;

/// Highest valid MIDI note or velocity value.
pub const MIDI_MAX: u8 = 127;

/// The seven natural pitch classes, each permanently bound to one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchClass {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchClass {
    /// Lane index on the strip, 0 through 6.
    pub fn lane(self) -> usize {
        self as usize
    }

    /// Label shown on the text display while a key of this class is held.
    pub fn label(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// Classifies a MIDI note into its pitch class, independent of octave.
///
/// Residues 1, 3, 6, 8 and 10 (the sharp/flat classes) return `Ok(None)`.
/// Notes above [`MIDI_MAX`] are invalid input, not silently clamped.
pub fn classify(note: u8) -> Result<Option<PitchClass>> {
    if note > MIDI_MAX {
        return Err(KeylightError::NoteOutOfRange(note));
    }

    Ok(match note % 12 {
        0 => Some(PitchClass::C),
        2 => Some(PitchClass::D),
        4 => Some(PitchClass::E),
        5 => Some(PitchClass::F),
        7 => Some(PitchClass::G),
        9 => Some(PitchClass::A),
        11 => Some(PitchClass::B),
        _ => None,
    })
}
