//! # Public API
//!
//! Whole-song entry points built on the per-chord engine.
//!
//! - [`analyze()`] - key, numerals and positioned chords for a song
//! - [`analyze_with_config()`] - same, with a custom [`DetectorConfig`]
//! - [`transpose_text()`] - rewrite every chord of a song by N semitones
//! - [`nashville_text()`] - rewrite every chord of a song as a numeral
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordkey::analyze;
//!
//! let source = r#"---
//! title: Amazing Grace
//! ---
//! A[G]mazing [G7]grace how [C]sweet the [G]sound
//! That [G]saved a [Em]wretch like [D]me
//! "#;
//!
//! let analysis = analyze(source)?;
//! assert_eq!(analysis.effective_key.as_deref(), Some("G"));
//! assert_eq!(analysis.progression, vec!["I", "I7", "IV", "I", "I", "vi", "V"]);
//! # Ok::<(), chordkey::ChordError>(())
//! ```

use crate::config::DetectorConfig;
use crate::detect::{detect_key_with_config, KeyDetectionResult};
use crate::error::ChordError;
use crate::lexer::ParsedLine;
use crate::nashville::{nashville_progression, to_nashville};
use crate::pitch::Spelling;
use crate::song::{map_song_chords, Song};
use crate::transpose::{spelling_after, transpose_chord, transpose_key};
use serde::Serialize;
use tracing::info;

/// Everything the rendering and search layers need to know about a song
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_key: Option<String>,
    pub detection: KeyDetectionResult,
    /// Declared key when it is a real key, otherwise the detected one
    pub effective_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capo: Option<u8>,
    /// Key that actually sounds with the capo on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounding_key: Option<String>,
    /// Chord tokens in document order
    pub chords: Vec<String>,
    /// Numeral of each chord in the effective key
    pub progression: Vec<String>,
    pub lines: Vec<ParsedLine>,
}

/// Analyze a song with the default detector policy.
pub fn analyze(source: &str) -> Result<SongAnalysis, ChordError> {
    analyze_with_config(source, &DetectorConfig::default())
}

/// Analyze a song.
///
/// # Errors
/// Only malformed frontmatter fails; chord text never does.
pub fn analyze_with_config(
    source: &str,
    config: &DetectorConfig,
) -> Result<SongAnalysis, ChordError> {
    let song = Song::parse(source)?;
    let chords = song.chords();
    let detection = detect_key_with_config(&chords, config);

    let effective_key = song
        .declared_key()
        .map(|key| key.to_string())
        .or_else(|| detection.key.clone());

    let progression = match &effective_key {
        Some(key) => nashville_progression(&chords, key),
        None => chords.clone(),
    };

    let capo = song.metadata.capo;
    let sounding_key = match (&effective_key, capo) {
        (Some(key), Some(capo)) if capo > 0 => {
            transpose_key(key, capo as i32, spelling_after(key, capo as i32))
        }
        _ => None,
    };

    info!(
        chords = chords.len(),
        key = effective_key.as_deref().unwrap_or("-"),
        confidence = detection.confidence,
        "analyzed song"
    );

    Ok(SongAnalysis {
        title: song.metadata.title.clone(),
        artist: song.metadata.artist.clone(),
        declared_key: song.metadata.key.clone(),
        detection,
        effective_key,
        capo,
        sounding_key,
        chords,
        progression,
        lines: song.lines(),
    })
}

/// Transpose every chord in a song, leaving lyrics and metadata untouched.
///
/// ```
/// use chordkey::{transpose_text, Spelling};
///
/// let text = "[G]Hello [D/F#]world";
/// assert_eq!(transpose_text(text, 3, Spelling::Flats), "[Bb]Hello [F/A]world");
/// ```
pub fn transpose_text(text: &str, semitones: i32, spelling: Spelling) -> String {
    map_song_chords(text, |chord| transpose_chord(chord, semitones, spelling))
}

/// Replace every chord in a song with its numeral in `key`.
///
/// An unknown key leaves the text unchanged.
pub fn nashville_text(text: &str, key: &str) -> String {
    map_song_chords(text, |chord| to_nashville(chord, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_detects_key() {
        let analysis = analyze("[Am]One [Dm]two [E]three\n[Am]four [G]five [Am]six").unwrap();
        assert_eq!(analysis.detection.key.as_deref(), Some("Am"));
        assert_eq!(analysis.effective_key.as_deref(), Some("Am"));
        assert_eq!(analysis.progression, vec!["i", "iv", "V", "i", "VII", "i"]);
        assert_eq!(analysis.lines.len(), 2);
        assert_eq!(analysis.capo, None);
        assert_eq!(analysis.sounding_key, None);
    }

    #[test]
    fn test_declared_key_wins() {
        let source = "---\nkey: C\n---\n[G]One [C]two [D]three [G]four";
        let analysis = analyze(source).unwrap();
        assert_eq!(analysis.detection.key.as_deref(), Some("G"));
        assert_eq!(analysis.effective_key.as_deref(), Some("C"));
        assert_eq!(analysis.progression, vec!["V", "I", "II", "V"]);
    }

    #[test]
    fn test_unknown_declared_key_falls_back() {
        let source = "---\nkey: Q\n---\n[G]One [C]two [D]three [G]four";
        let analysis = analyze(source).unwrap();
        assert_eq!(analysis.declared_key.as_deref(), Some("Q"));
        assert_eq!(analysis.effective_key.as_deref(), Some("G"));
    }

    #[test]
    fn test_no_chords() {
        let analysis = analyze("just lyrics\nno chords").unwrap();
        assert_eq!(analysis.detection.key, None);
        assert_eq!(analysis.detection.confidence, 0);
        assert_eq!(analysis.effective_key, None);
        assert!(analysis.progression.is_empty());
    }

    #[test]
    fn test_no_recognizable_chords() {
        let analysis = analyze("[N.C.]Spoken [x]intro").unwrap();
        assert_eq!(analysis.chords, vec!["N.C.", "x"]);
        assert_eq!(analysis.detection.key, None);
        assert_eq!(analysis.effective_key, None);
        assert_eq!(analysis.progression, vec!["N.C.", "x"]);
    }

    #[test]
    fn test_section_dividers() {
        let source = "[G]Verse [C]one\n---\n[D]Chorus [G]here\n---\n[Em]Verse [D]two\n";
        let analysis = analyze(source).unwrap();
        assert_eq!(analysis.title, None);
        assert_eq!(analysis.chords.len(), 6);
        assert_eq!(analysis.effective_key.as_deref(), Some("G"));
        assert_eq!(
            transpose_text(source, 2, Spelling::Sharps),
            "[A]Verse [D]one\n---\n[E]Chorus [A]here\n---\n[F#m]Verse [E]two\n"
        );
    }

    #[test]
    fn test_padded_chords_transpose() {
        assert_eq!(transpose_text("[G]a [ D]b", 2, Spelling::Sharps), "[A]a [E]b");
    }

    #[test]
    fn test_capo_sounding_key() {
        let source = "---\ncapo: 3\n---\n[G]One [C]two [D]three [G]four";
        let analysis = analyze(source).unwrap();
        assert_eq!(analysis.sounding_key.as_deref(), Some("Bb"));
    }

    #[test]
    fn test_bad_frontmatter_is_an_error() {
        assert!(matches!(
            analyze("---\ncapo: [1\n---\n[G]x"),
            Err(ChordError::MetadataError(_))
        ));
    }

    #[test]
    fn test_text_rewrites() {
        let text = "---\ntitle: [G]\n---\n[G]Hello [Em7]world";
        assert_eq!(
            transpose_text(text, 2, Spelling::Sharps),
            "---\ntitle: [G]\n---\n[A]Hello [F#m7]world"
        );
        assert_eq!(nashville_text(text, "G"), "---\ntitle: [G]\n---\n[I]Hello [vi7]world");
        assert_eq!(nashville_text(text, "nope"), text);
    }
}
