//! # Key Catalog
//!
//! The 24 major and minor keys with their diatonic triads, as a static table.
//!
//! Major keys list `I ii iii IV V vi vii°`. Minor keys list `i ii° III iv V VI
//! VII`, with the major dominant that chord charts in minor keys actually use
//! instead of the natural-minor `v`. Scales are written the way a chord chart
//! in that key would spell them and are normalized (see
//! [`normalize_chord`](crate::normalize_chord)) when matched against a song.
//!
//! `Ebm` spells its third degree `F#` so that it matches the tonic of its
//! relative major `F#`.

use crate::chord::normalize_chord;
use crate::error::ChordError;
use crate::pitch::{NoteName, PitchClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// One entry of the key catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    /// Key name, also the tonic chord (`G`, `Em`)
    pub name: &'static str,
    pub mode: Mode,
    /// Diatonic triads from the first to the seventh degree
    pub scale: [&'static str; 7],
    /// Name of the relative major/minor key
    pub relative: &'static str,
}

impl KeyDefinition {
    /// The tonic chord as written
    pub fn tonic(&self) -> &'static str {
        self.scale[0]
    }

    pub fn normalized_tonic(&self) -> String {
        normalize_chord(self.tonic()).unwrap_or_default()
    }

    pub fn normalized_scale(&self) -> Vec<String> {
        self.scale.iter().filter_map(|c| normalize_chord(c)).collect()
    }

    pub fn tonic_pitch(&self) -> PitchClass {
        NoteName::split_prefix(self.name)
            .map(|(root, _)| root.pitch_class())
            .unwrap_or(PitchClass::new(0))
    }

    pub fn relative_key(&self) -> Option<&'static KeyDefinition> {
        find_key(self.relative)
    }
}

const fn key(
    name: &'static str,
    mode: Mode,
    scale: [&'static str; 7],
    relative: &'static str,
) -> KeyDefinition {
    KeyDefinition {
        name,
        mode,
        scale,
        relative,
    }
}

/// All 24 keys, majors first in circle-of-fifths order, then their relative minors.
pub static KEY_CATALOG: [KeyDefinition; 24] = [
    key("C", Mode::Major, ["C", "Dm", "Em", "F", "G", "Am", "Bdim"], "Am"),
    key("G", Mode::Major, ["G", "Am", "Bm", "C", "D", "Em", "F#dim"], "Em"),
    key("D", Mode::Major, ["D", "Em", "F#m", "G", "A", "Bm", "C#dim"], "Bm"),
    key("A", Mode::Major, ["A", "Bm", "C#m", "D", "E", "F#m", "G#dim"], "F#m"),
    key("E", Mode::Major, ["E", "F#m", "G#m", "A", "B", "C#m", "D#dim"], "C#m"),
    key("B", Mode::Major, ["B", "C#m", "D#m", "E", "F#", "G#m", "A#dim"], "G#m"),
    key("F#", Mode::Major, ["F#", "G#m", "A#m", "B", "C#", "D#m", "E#dim"], "Ebm"),
    key("Db", Mode::Major, ["Db", "Ebm", "Fm", "Gb", "Ab", "Bbm", "Cdim"], "Bbm"),
    key("Ab", Mode::Major, ["Ab", "Bbm", "Cm", "Db", "Eb", "Fm", "Gdim"], "Fm"),
    key("Eb", Mode::Major, ["Eb", "Fm", "Gm", "Ab", "Bb", "Cm", "Ddim"], "Cm"),
    key("Bb", Mode::Major, ["Bb", "Cm", "Dm", "Eb", "F", "Gm", "Adim"], "Gm"),
    key("F", Mode::Major, ["F", "Gm", "Am", "Bb", "C", "Dm", "Edim"], "Dm"),
    key("Am", Mode::Minor, ["Am", "Bdim", "C", "Dm", "E", "F", "G"], "C"),
    key("Em", Mode::Minor, ["Em", "F#dim", "G", "Am", "B", "C", "D"], "G"),
    key("Bm", Mode::Minor, ["Bm", "C#dim", "D", "Em", "F#", "G", "A"], "D"),
    key("F#m", Mode::Minor, ["F#m", "G#dim", "A", "Bm", "C#", "D", "E"], "A"),
    key("C#m", Mode::Minor, ["C#m", "D#dim", "E", "F#m", "G#", "A", "B"], "E"),
    key("G#m", Mode::Minor, ["G#m", "A#dim", "B", "C#m", "D#", "E", "F#"], "B"),
    key("Ebm", Mode::Minor, ["Ebm", "Fdim", "F#", "Abm", "Bb", "B", "Db"], "F#"),
    key("Bbm", Mode::Minor, ["Bbm", "Cdim", "Db", "Ebm", "F", "Gb", "Ab"], "Db"),
    key("Fm", Mode::Minor, ["Fm", "Gdim", "Ab", "Bbm", "C", "Db", "Eb"], "Ab"),
    key("Cm", Mode::Minor, ["Cm", "Ddim", "Eb", "Fm", "G", "Ab", "Bb"], "Eb"),
    key("Gm", Mode::Minor, ["Gm", "Adim", "Bb", "Cm", "D", "Eb", "F"], "Bb"),
    key("Dm", Mode::Minor, ["Dm", "Edim", "F", "Gm", "A", "Bb", "C"], "F"),
];

/// Look a key up by its catalog name (`"G"`, `"F#m"`, `"Ebm"`).
pub fn find_key(name: &str) -> Option<&'static KeyDefinition> {
    KEY_CATALOG.iter().find(|k| k.name == name)
}

/// A key name in any spelling (`Gb`, `D#m`, `Ebm`), resolved to tonic and mode.
///
/// ```
/// use chordkey::{Key, Mode};
///
/// let key: Key = "D#m".parse().unwrap();
/// assert_eq!(key.mode, Mode::Minor);
/// assert_eq!(key.definition().unwrap().name, "Ebm");
/// assert!(Key::parse("X").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub tonic: NoteName,
    pub mode: Mode,
}

impl Key {
    /// Parse `Root` or `Root + "m"`; anything else is not a key.
    pub fn parse(name: &str) -> Option<Key> {
        let (tonic, rest) = NoteName::split_prefix(name.trim())?;
        let mode = match rest {
            "" => Mode::Major,
            "m" => Mode::Minor,
            _ => return None,
        };
        Some(Key { tonic, mode })
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.tonic.pitch_class()
    }

    /// The catalog entry with the same tonic pitch and mode.
    pub fn definition(&self) -> Option<&'static KeyDefinition> {
        let pitch = self.pitch_class();
        KEY_CATALOG
            .iter()
            .find(|k| k.mode == self.mode && k.tonic_pitch() == pitch)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{}", self.tonic),
            Mode::Minor => write!(f, "{}m", self.tonic),
        }
    }
}

impl FromStr for Key {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s).ok_or_else(|| ChordError::UnknownKey(s.to_string()))
    }
}
