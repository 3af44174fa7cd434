//! Chord, key and Nashville-number analysis for songs written in ChordPro
//! bracket notation (`[G]Hello [C]world`).
//!
//! The per-chord engine (normalization, key detection, numerals, transposition,
//! line segmentation) is pure and never fails; [`analyze`] and friends wrap it
//! for whole songs with YAML frontmatter.

pub mod api;
pub mod chord;
pub mod config;
pub mod detect;
pub mod error;
pub mod keys;
pub mod lexer;
pub mod nashville;
pub mod pitch;
pub mod song;
pub mod transpose;

pub use api::{analyze, analyze_with_config, nashville_text, transpose_text, SongAnalysis};
pub use chord::{chord_quality, normalize_chord, parse_root, Chord, ChordQuality};
pub use config::DetectorConfig;
pub use detect::{detect_key, detect_key_with_config, score_keys, KeyDetectionResult, KeyScore};
pub use error::ChordError;
pub use keys::{find_key, Key, KeyDefinition, Mode, KEY_CATALOG};
pub use lexer::{extract_chord_tokens, parse_line_with_chords, ChordPosition, ParsedLine};
pub use nashville::{nashville_numeral, nashville_progression, to_nashville, NashvilleNumeral};
pub use pitch::{NoteName, PitchClass, Spelling};
pub use song::{Song, SongMetadata};
pub use transpose::{semitones_between_keys, spelling_after, transpose_chord, transpose_key};
