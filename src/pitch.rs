//! # Pitch Model
//!
//! Spelled note names (`F#`, `Bb`, `E`) and the twelve chromatic pitch classes
//! they denote.
//!
//! A [`NoteName`] keeps the spelling the author wrote, because normalization and
//! key matching compare spellings. A [`PitchClass`] is the spelling-free identity
//! (0 = C ... 11 = B) used for interval arithmetic. Going back from a pitch class
//! to a name needs a [`Spelling`] preference and uses the two 12-entry tables
//! [`SHARP_NAMES`] and [`FLAT_NAMES`].

use crate::error::ChordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sharp-preferred spelling of each pitch class, indexed from C.
pub const SHARP_NAMES: [NoteName; 12] = {
    use Accidental::*;
    use Letter::*;
    [
        NoteName::new(C, Natural),
        NoteName::new(C, Sharp),
        NoteName::new(D, Natural),
        NoteName::new(D, Sharp),
        NoteName::new(E, Natural),
        NoteName::new(F, Natural),
        NoteName::new(F, Sharp),
        NoteName::new(G, Natural),
        NoteName::new(G, Sharp),
        NoteName::new(A, Natural),
        NoteName::new(A, Sharp),
        NoteName::new(B, Natural),
    ]
};

/// Flat-preferred spelling of each pitch class, indexed from C.
pub const FLAT_NAMES: [NoteName; 12] = {
    use Accidental::*;
    use Letter::*;
    [
        NoteName::new(C, Natural),
        NoteName::new(D, Flat),
        NoteName::new(D, Natural),
        NoteName::new(E, Flat),
        NoteName::new(E, Natural),
        NoteName::new(F, Natural),
        NoteName::new(G, Flat),
        NoteName::new(G, Natural),
        NoteName::new(A, Flat),
        NoteName::new(A, Natural),
        NoteName::new(B, Flat),
        NoteName::new(B, Natural),
    ]
};

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Semitones above C of the natural letter
    fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }
}

/// Chord roots only ever carry a single sharp or flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp, // #
    Flat,  // b
}

impl Accidental {
    fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A spelled pitch name such as `C`, `F#` or `Bb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl NoteName {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// Split a leading root (`A`-`G`, optionally followed by `#` or `b`) off a token.
    ///
    /// Returns the root and the unparsed remainder, or `None` if the token does
    /// not start with a pitch letter.
    ///
    /// ```
    /// use chordkey::pitch::{Accidental, Letter, NoteName};
    ///
    /// let (root, rest) = NoteName::split_prefix("F#m7").unwrap();
    /// assert_eq!(root, NoteName::new(Letter::F, Accidental::Sharp));
    /// assert_eq!(rest, "m7");
    /// assert!(NoteName::split_prefix("Hm").is_none());
    /// ```
    pub fn split_prefix(token: &str) -> Option<(NoteName, &str)> {
        let mut chars = token.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let rest = &token[1..];
        let (accidental, rest) = match rest.chars().next() {
            Some('#') => (Accidental::Sharp, &rest[1..]),
            Some('b') => (Accidental::Flat, &rest[1..]),
            _ => (Accidental::Natural, rest),
        };
        Some((NoteName::new(letter, accidental), rest))
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::new(self.letter.semitone() + self.accidental.offset())
    }

    /// Enharmonic normalization used for chord identities and key matching.
    ///
    /// `C# D# E# Fb G# A# B# Cb` become `Db Eb F E Ab Bb C B`. `F#` is left alone
    /// so that it keeps matching the key named "F#"; every other spelling is
    /// already normal.
    pub fn normalized(self) -> NoteName {
        use Accidental::*;
        use Letter::*;
        match (self.letter, self.accidental) {
            (C, Sharp) => NoteName::new(D, Flat),
            (D, Sharp) => NoteName::new(E, Flat),
            (E, Sharp) => NoteName::new(F, Natural),
            (F, Flat) => NoteName::new(E, Natural),
            (G, Sharp) => NoteName::new(A, Flat),
            (A, Sharp) => NoteName::new(B, Flat),
            (B, Sharp) => NoteName::new(C, Natural),
            (C, Flat) => NoteName::new(B, Natural),
            _ => self,
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "#"),
            Accidental::Flat => write!(f, "b"),
        }
    }
}

impl FromStr for NoteName {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NoteName::split_prefix(s.trim()) {
            Some((name, "")) => Ok(name),
            _ => Err(ChordError::InvalidChord(s.to_string())),
        }
    }
}

/// One of the twelve chromatic pitches, 0 = C through 11 = B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Wraps any semitone count into 0..12.
    pub fn new(semitone: i32) -> Self {
        PitchClass(semitone.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Upward distance in semitones from `from` to `self`, in 0..12.
    pub fn interval_from(self, from: PitchClass) -> u8 {
        (self.0 as i32 - from.0 as i32).rem_euclid(12) as u8
    }

    /// Name of this pitch class from the sharp or flat table.
    ///
    /// ```
    /// use chordkey::{PitchClass, Spelling};
    ///
    /// assert_eq!(PitchClass::new(10).spell(Spelling::Flats).to_string(), "Bb");
    /// assert_eq!(PitchClass::new(10).spell(Spelling::Sharps).to_string(), "A#");
    /// ```
    pub fn spell(self, spelling: Spelling) -> NoteName {
        match spelling {
            Spelling::Sharps => SHARP_NAMES[self.0 as usize],
            Spelling::Flats => FLAT_NAMES[self.0 as usize],
        }
    }
}

/// Which enharmonic spelling to use when a pitch class is turned back into a name.
///
/// The caller owns this preference (usually derived from the key being
/// displayed); nothing in the crate remembers it between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharps,
    Flats,
}

impl Spelling {
    /// Conventional spelling for a key name: flats for keys whose signature
    /// carries flats (`F`, `Bb`, `Dm`, `Ebm`, ...), sharps otherwise.
    ///
    /// Unknown names fall back to sharps.
    ///
    /// ```
    /// use chordkey::Spelling;
    ///
    /// assert_eq!(Spelling::for_key("Eb"), Spelling::Flats);
    /// assert_eq!(Spelling::for_key("Dm"), Spelling::Flats);
    /// assert_eq!(Spelling::for_key("A"), Spelling::Sharps);
    /// assert_eq!(Spelling::for_key("?"), Spelling::Sharps);
    /// ```
    pub fn for_key(key: &str) -> Spelling {
        let key = key.trim();
        match NoteName::split_prefix(key) {
            Some((root, rest)) if rest.is_empty() || rest == "m" => {
                let flat_signature = matches!(key, "F" | "Dm" | "Gm" | "Cm" | "Fm");
                if root.accidental == Accidental::Flat || flat_signature {
                    Spelling::Flats
                } else {
                    Spelling::Sharps
                }
            }
            _ => Spelling::Sharps,
        }
    }
}
