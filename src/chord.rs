//! # Chord Parsing and Normalization
//!
//! Chord tokens are read permissively: anything that starts with a pitch letter
//! is a chord, and whatever follows the root is classified as major, minor or
//! diminished by a few prefix rules. Extensions (`7`, `maj7`, `sus4`, `add9`, ...)
//! are never interpreted, only carried along verbatim.
//!
//! ## Quality Rules
//! Applied to the text after the root:
//! - **Minor**: starts with `m` but not `maj` (`m`, `m7`, `min`, `m7b5`)
//! - **Diminished**: contains `dim`, is exactly `o`, or starts with `o7`
//! - **Major**: everything else, including text that makes no sense
//!
//! ## Normalized Identity
//! [`normalize_chord`] reduces a token to `root + quality suffix` (`""`, `"m"`,
//! `"dim"`) with the root enharmonically normalized (see
//! [`NoteName::normalized`]). Key detection counts chords by this identity.

use crate::error::ChordError;
use crate::pitch::NoteName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Triad quality as far as key matching is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordQuality {
    #[default]
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    /// Classify the text that follows a chord root.
    pub fn from_suffix(rest: &str) -> Self {
        if rest.starts_with('m') && !rest.starts_with("maj") {
            ChordQuality::Minor
        } else if rest.contains("dim") || rest == "o" || rest.starts_with("o7") {
            ChordQuality::Diminished
        } else {
            ChordQuality::Major
        }
    }

    /// Suffix used in normalized chord identities.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }
}

/// Leading root of a chord token, if it has one.
pub fn parse_root(token: &str) -> Option<NoteName> {
    NoteName::split_prefix(token.trim()).map(|(root, _)| root)
}

/// Quality of a chord token. Tokens without a root count as major.
pub fn chord_quality(token: &str) -> ChordQuality {
    match NoteName::split_prefix(token.trim()) {
        Some((_, rest)) => ChordQuality::from_suffix(rest),
        None => ChordQuality::Major,
    }
}

/// Canonical `root + quality` identity of a chord token.
///
/// # Examples
/// ```
/// use chordkey::normalize_chord;
///
/// assert_eq!(normalize_chord("C#").as_deref(), Some("Db"));
/// assert_eq!(normalize_chord("D#m7").as_deref(), Some("Ebm"));
/// assert_eq!(normalize_chord("F#").as_deref(), Some("F#"));
/// assert_eq!(normalize_chord("Bo7").as_deref(), Some("Bdim"));
/// assert_eq!(normalize_chord(""), None);
/// ```
pub fn normalize_chord(token: &str) -> Option<String> {
    let (root, rest) = NoteName::split_prefix(token.trim())?;
    let quality = ChordQuality::from_suffix(rest);
    Some(format!("{}{}", root.normalized(), quality.suffix()))
}

/// A chord token split into its parts.
///
/// `marker` is the quality marker exactly as written (`m`, `min`, `dim`, `o`, or
/// empty) and `extension` is everything after it, so that
/// `root + marker + extension (+ "/" + bass)` gives the token back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub root: NoteName,
    pub quality: ChordQuality,
    pub marker: String,
    pub extension: String,
    pub bass: Option<NoteName>,
}

impl Chord {
    /// Parse a chord token, returning `None` when it has no root.
    ///
    /// ```
    /// use chordkey::{Chord, ChordQuality};
    ///
    /// let chord = Chord::parse("F#m7/C#").unwrap();
    /// assert_eq!(chord.root.to_string(), "F#");
    /// assert_eq!(chord.quality, ChordQuality::Minor);
    /// assert_eq!(chord.extension, "7");
    /// assert_eq!(chord.bass.map(|b| b.to_string()).as_deref(), Some("C#"));
    /// ```
    pub fn parse(token: &str) -> Option<Chord> {
        let (root, rest) = NoteName::split_prefix(token.trim())?;
        let quality = ChordQuality::from_suffix(rest);

        let (body, bass) = match rest.rfind('/') {
            Some(slash) => match rest[slash + 1..].parse::<NoteName>() {
                Ok(bass) => (&rest[..slash], Some(bass)),
                Err(_) => (rest, None),
            },
            None => (rest, None),
        };

        let (marker, extension) = split_marker(body, quality);
        Some(Chord {
            root,
            quality,
            marker,
            extension,
            bass,
        })
    }

    /// Same identity [`normalize_chord`] gives the original token.
    pub fn normalized(&self) -> String {
        format!("{}{}", self.root.normalized(), self.quality.suffix())
    }

    /// Extension followed by the slash bass as written, e.g. `7/B`.
    pub fn extension_with_bass(&self) -> String {
        match self.bass {
            Some(bass) => format!("{}/{}", self.extension, bass),
            None => self.extension.clone(),
        }
    }
}

/// Separate the quality marker from the extension that follows it.
fn split_marker(body: &str, quality: ChordQuality) -> (String, String) {
    match quality {
        ChordQuality::Minor => {
            let len = if body.starts_with("min") { 3 } else { 1 };
            (body[..len].to_string(), body[len..].to_string())
        }
        ChordQuality::Diminished => {
            if let Some(pos) = body.find("dim") {
                let extension = format!("{}{}", &body[..pos], &body[pos + 3..]);
                ("dim".to_string(), extension)
            } else if body.starts_with('o') {
                ("o".to_string(), body[1..].to_string())
            } else {
                (String::new(), body.to_string())
            }
        }
        ChordQuality::Major => (String::new(), body.to_string()),
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.root, self.marker, self.extension)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl FromStr for Chord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::parse(s).ok_or_else(|| ChordError::InvalidChord(s.to_string()))
    }
}
