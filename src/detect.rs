//! # Key Detection
//!
//! Infers the key of a song from the chords it uses.
//!
//! ## Scoring
//! Every catalog key gets
//! ```text
//! score = (chords in the key's diatonic set + tonic_weight * tonic chords) / all chord tokens
//! ```
//! Tokens that are not chords still count in the denominator. With the default
//! tonic weight of 0.5 a score lies in `0.0..=1.5`.
//!
//! ## Selection
//! 1. Highest score wins; equal scores go to the key whose tonic chord occurs more often.
//! 2. **Relative-key correction**: if the winner's relative major/minor scores within
//!    `relative_key_threshold` and its tonic occurs strictly more often, it wins instead.
//! 3. **Preferred-key override**: walking the preferred-key list up to the current winner,
//!    the first key scoring within `preferred_key_margin` whose tonic occurs at least as
//!    often as the winner's tonic takes over.
//!
//! The order of steps 2 and 3 matters on ambiguous input and is part of the contract.
//!
//! ## Example
//! ```rust
//! use chordkey::{detect_key, Mode};
//!
//! let result = detect_key(&["G", "C", "D", "G", "Em", "D", "G"]);
//! assert_eq!(result.key.as_deref(), Some("G"));
//! assert_eq!(result.mode, Some(Mode::Major));
//! ```

use crate::chord::normalize_chord;
use crate::config::DetectorConfig;
use crate::keys::{find_key, KeyDefinition, Mode, KEY_CATALOG};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of key detection
///
/// `confidence` is the winning score scaled to 0..=100, not a probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDetectionResult {
    pub key: Option<String>,
    pub mode: Option<Mode>,
    pub confidence: u8,
}

impl KeyDetectionResult {
    fn empty() -> Self {
        Self {
            key: None,
            mode: None,
            confidence: 0,
        }
    }
}

/// Score of one candidate key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyScore {
    pub key: &'static KeyDefinition,
    pub score: f64,
    /// Occurrences of the key's tonic chord
    pub tonic_count: usize,
}

/// Occurrences of each normalized chord identity. Tokens without a root are skipped.
pub fn chord_counts<S: AsRef<str>>(tokens: &[S]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        if let Some(chord) = normalize_chord(token.as_ref()) {
            *counts.entry(chord).or_insert(0) += 1;
        }
    }
    counts
}

/// Score every catalog key, in catalog order.
///
/// Scores nothing when no token has a root, including empty input.
pub fn score_keys<S: AsRef<str>>(tokens: &[S], config: &DetectorConfig) -> Vec<KeyScore> {
    let counts = chord_counts(tokens);
    if counts.is_empty() {
        return Vec::new();
    }
    let total = tokens.len() as f64;
    let count_of = |chord: &str| counts.get(chord).copied().unwrap_or(0);

    KEY_CATALOG
        .iter()
        .map(|key| {
            let match_weight: usize = key.normalized_scale().iter().map(|c| count_of(c)).sum();
            let tonic_count = count_of(&key.normalized_tonic());
            let tonic_weight = config.tonic_weight * tonic_count as f64;
            let score = (match_weight as f64 + tonic_weight) / total;
            trace!(key = key.name, score, tonic_count, "scored key");
            KeyScore {
                key,
                score,
                tonic_count,
            }
        })
        .collect()
}

/// Detect the key of a chord sequence with the default policy.
pub fn detect_key<S: AsRef<str>>(tokens: &[S]) -> KeyDetectionResult {
    detect_key_with_config(tokens, &DetectorConfig::default())
}

/// Detect the key of a chord sequence.
///
/// Returns `{ key: None, mode: None, confidence: 0 }` for an empty sequence or
/// one in which no token is a chord.
pub fn detect_key_with_config<S: AsRef<str>>(
    tokens: &[S],
    config: &DetectorConfig,
) -> KeyDetectionResult {
    let scores = score_keys(tokens, config);
    let Some(mut best) = strongest(&scores) else {
        return KeyDetectionResult::empty();
    };

    if let Some(relative) = score_of(&scores, best.key.relative) {
        if (best.score - relative.score).abs() < config.relative_key_threshold
            && relative.tonic_count > best.tonic_count
        {
            debug!(from = best.key.name, to = relative.key.name, "relative key has stronger tonic");
            best = relative;
        }
    }

    for name in &config.preferred_keys {
        if name == best.key.name {
            break;
        }
        if let Some(preferred) = score_of(&scores, name) {
            if preferred.score >= best.score - config.preferred_key_margin
                && preferred.tonic_count >= best.tonic_count
            {
                debug!(from = best.key.name, to = preferred.key.name, "preferring common key");
                best = preferred;
                break;
            }
        }
    }

    let confidence = (best.score / config.max_score * 100.0).round().clamp(0.0, 100.0) as u8;
    debug!(key = best.key.name, score = best.score, confidence, "detected key");

    KeyDetectionResult {
        key: Some(best.key.name.to_string()),
        mode: Some(best.key.mode),
        confidence,
    }
}

/// Highest score, ties going to the more frequent tonic, then to catalog order.
fn strongest(scores: &[KeyScore]) -> Option<&KeyScore> {
    let mut best: Option<&KeyScore> = None;
    for candidate in scores {
        best = match best {
            Some(current)
                if candidate.score > current.score
                    || (candidate.score == current.score
                        && candidate.tonic_count > current.tonic_count) =>
            {
                Some(candidate)
            }
            Some(current) => Some(current),
            None => Some(candidate),
        };
    }
    best
}

fn score_of<'a>(scores: &'a [KeyScore], name: &str) -> Option<&'a KeyScore> {
    let key = find_key(name)?;
    scores.iter().find(|s| s.key.name == key.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(tokens: &[&str]) -> (Option<String>, Option<Mode>, u8) {
        let result = detect_key(tokens);
        (result.key, result.mode, result.confidence)
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(
            detect_key(&empty),
            KeyDetectionResult {
                key: None,
                mode: None,
                confidence: 0
            }
        );
    }

    #[test]
    fn test_major_progression() {
        let (key, mode, confidence) = detect(&["G", "C", "D", "G", "Em", "D", "G"]);
        assert_eq!(key.as_deref(), Some("G"));
        assert_eq!(mode, Some(Mode::Major));
        assert_eq!(confidence, 81);
    }

    #[test]
    fn test_minor_progression() {
        let (key, mode, confidence) = detect(&["Am", "Dm", "E", "Am", "G", "Am"]);
        assert_eq!(key.as_deref(), Some("Am"));
        assert_eq!(mode, Some(Mode::Minor));
        assert_eq!(confidence, 83);
    }

    #[test]
    fn test_strong_tonic_beats_earlier_preferred_key() {
        // E and A tie on score; A comes first in the preferred list but its tonic is rare
        let tokens = ["E", "E", "D", "E", "A", "E", "G", "E", "D", "E", "A"];
        let (key, mode, confidence) = detect(&tokens);
        assert_eq!(key.as_deref(), Some("E"));
        assert_eq!(mode, Some(Mode::Major));
        assert_eq!(confidence, 67);
    }

    #[test]
    fn test_relative_key_correction() {
        // C scores slightly higher but Am is the chord the song keeps returning to
        let tokens = [
            "Am", "F", "C", "G", "Am", "F", "Em", "G", "Am", "F", "Em", "G",
        ];
        let scores = score_keys(&tokens, &DetectorConfig::default());
        let c = scores.iter().find(|s| s.key.name == "C").unwrap();
        let am = scores.iter().find(|s| s.key.name == "Am").unwrap();
        assert!(c.score > am.score);

        let (key, mode, confidence) = detect(&tokens);
        assert_eq!(key.as_deref(), Some("Am"));
        assert_eq!(mode, Some(Mode::Minor));
        assert_eq!(confidence, 64);
    }

    #[test]
    fn test_preferred_key_override() {
        // B edges out E by less than the margin and E's tonic is just as frequent
        let mut tokens = Vec::new();
        for _ in 0..12 {
            tokens.extend(["E", "B", "C#m"]);
        }
        tokens.push("F#");

        let (key, _, confidence) = detect(&tokens);
        assert_eq!(key.as_deref(), Some("E"));
        assert_eq!(confidence, 76);

        let strict = DetectorConfig {
            preferred_key_margin: 0.0,
            ..DetectorConfig::default()
        };
        assert_eq!(detect_key_with_config(&tokens, &strict).key.as_deref(), Some("B"));
    }

    #[test]
    fn test_unparsable_tokens_count_toward_total() {
        let clean = detect_key(&["G", "C", "D", "G"]);
        let noisy = detect_key(&["G", "C", "D", "G", "N.C.", "x"]);
        assert_eq!(clean.key, noisy.key);
        assert!(noisy.confidence < clean.confidence);
    }

    #[test]
    fn test_only_unparsable_tokens() {
        assert_eq!(detect_key(&["N.C.", "?"]), KeyDetectionResult::empty());
        assert_eq!(detect_key(&["x"]), KeyDetectionResult::empty());
        assert!(score_keys(&["N.C."], &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_enharmonic_tokens_match_keys() {
        let (key, _, _) = detect(&["Db", "Gb", "Ab", "Db", "Bbm", "Ab", "Db"]);
        assert_eq!(key.as_deref(), Some("Db"));

        let (key, _, _) = detect(&["C#", "F#", "G#", "C#", "A#m", "G#", "C#"]);
        assert_eq!(key.as_deref(), Some("Db"));

        let (key, _, _) = detect(&["F#", "B", "C#", "F#", "D#m", "C#", "F#"]);
        assert_eq!(key.as_deref(), Some("F#"));
    }

    #[test]
    fn test_confidence_is_bounded() {
        let result = detect_key(&["C", "C", "C", "C"]);
        assert_eq!(result.key.as_deref(), Some("C"));
        assert_eq!(result.confidence, 100);

        let scores = score_keys(&["C", "C", "C", "C"], &DetectorConfig::default());
        assert!(scores.iter().all(|s| s.score <= 1.5));
    }

    #[test]
    fn test_chord_counts_use_normalized_identity() {
        let counts = chord_counts(&["C#m7", "Dbm", "G/B", "G", "??"]);
        assert_eq!(counts.get("Dbm"), Some(&2));
        assert_eq!(counts.get("G"), Some(&2));
        assert_eq!(counts.len(), 2);
    }
}
