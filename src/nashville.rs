//! # Nashville Numbers
//!
//! Converts chords to Roman-numeral scale degrees relative to a key.
//!
//! The degree comes from the interval between the chord root and the key's tonic.
//! Intervals outside the key's scale get a `b`/`#` prefix (`bVII`, `bIII`). The
//! numeral's case then follows the chord's own quality: upper case for major,
//! lower case for minor, lower case plus `°` for diminished. Extensions are
//! appended exactly as written.
//!
//! ```rust
//! use chordkey::to_nashville;
//!
//! assert_eq!(to_nashville("G7", "G"), "I7");
//! assert_eq!(to_nashville("Em", "G"), "vi");
//! assert_eq!(to_nashville("F", "G"), "bVII");
//! assert_eq!(to_nashville("G", "X"), "G");
//! ```

use crate::chord::{Chord, ChordQuality};
use crate::keys::{Key, Mode};
use serde::Serialize;
use std::fmt;

/// Scale degree slot: chromatic prefix, Roman numeral, and the quality the key
/// itself would give a chord on that degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Degree {
    prefix: &'static str,
    numeral: &'static str,
    expected: ChordQuality,
}

const fn degree(prefix: &'static str, numeral: &'static str, expected: ChordQuality) -> Degree {
    Degree {
        prefix,
        numeral,
        expected,
    }
}

use ChordQuality::{Diminished as Dim, Major as Maj, Minor as Min};

/// Degrees by semitone interval above the tonic of a major key
const MAJOR_DEGREES: [Degree; 12] = [
    degree("", "I", Maj),
    degree("b", "II", Maj),
    degree("", "II", Min),
    degree("b", "III", Maj),
    degree("", "III", Min),
    degree("", "IV", Maj),
    degree("b", "V", Maj),
    degree("", "V", Maj),
    degree("b", "VI", Maj),
    degree("", "VI", Min),
    degree("b", "VII", Maj),
    degree("", "VII", Dim),
];

/// Degrees by semitone interval above the tonic of a minor key
const MINOR_DEGREES: [Degree; 12] = [
    degree("", "I", Min),
    degree("b", "II", Maj),
    degree("", "II", Dim),
    degree("", "III", Maj),
    degree("#", "III", Maj),
    degree("", "IV", Min),
    degree("b", "V", Maj),
    degree("", "V", Maj),
    degree("", "VI", Maj),
    degree("#", "VI", Maj),
    degree("", "VII", Maj),
    degree("", "VII", Dim),
];

/// A chord written as a scale degree, e.g. `bVII`, `ii7`, `vii°`, `I/B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NashvilleNumeral {
    /// `b`, `#` or empty
    pub accidental: &'static str,
    /// Upper-case Roman numeral I-VII
    pub degree: &'static str,
    pub quality: ChordQuality,
    /// Extension (and slash bass) copied from the chord
    pub extension: String,
    /// Whether the chord is the one the key itself builds on this degree
    pub diatonic: bool,
}

impl fmt::Display for NashvilleNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.accidental)?;
        match self.quality {
            ChordQuality::Major => write!(f, "{}", self.degree)?,
            ChordQuality::Minor => write!(f, "{}", self.degree.to_lowercase())?,
            ChordQuality::Diminished => write!(f, "{}°", self.degree.to_lowercase())?,
        }
        write!(f, "{}", self.extension)
    }
}

/// Numeral of `chord` in `key`, or `None` if either does not parse.
///
/// `key` is resolved to its catalog entry, so any enharmonic spelling of a
/// catalog key works (`Gb` reads as `F#`, `D#m` as `Ebm`).
pub fn nashville_numeral(chord: &str, key: &str) -> Option<NashvilleNumeral> {
    let key = Key::parse(key)?.definition()?;
    let chord = Chord::parse(chord)?;
    let interval = chord.root.pitch_class().interval_from(key.tonic_pitch());
    let table = match key.mode {
        Mode::Major => &MAJOR_DEGREES,
        Mode::Minor => &MINOR_DEGREES,
    };
    let slot = table[interval as usize];

    Some(NashvilleNumeral {
        accidental: slot.prefix,
        degree: slot.numeral,
        quality: chord.quality,
        extension: chord.extension_with_bass(),
        diatonic: slot.prefix.is_empty() && slot.expected == chord.quality,
    })
}

/// Nashville numeral of `chord` in `key` as text.
///
/// Returns `chord` unchanged when the chord has no root, or the key is empty
/// or is not a key name (`X`, `Cmaj`, `G7`).
pub fn to_nashville(chord: &str, key: &str) -> String {
    match nashville_numeral(chord, key) {
        Some(numeral) => numeral.to_string(),
        None => chord.to_string(),
    }
}

/// Numerals for a whole chord sequence, in order.
pub fn nashville_progression<S: AsRef<str>>(chords: &[S], key: &str) -> Vec<String> {
    chords.iter().map(|c| to_nashville(c.as_ref(), key)).collect()
}
