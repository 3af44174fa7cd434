//! # Song Documents
//!
//! A song is bracket-annotated text with an optional YAML metadata block
//! between two `---` lines, at the top or the bottom of the file:
//!
//! ```text
//! ---
//! title: Amazing Grace
//! key: G
//! capo: 2
//! ---
//! [G]Amazing [G7]grace how [C]sweet the [G]sound
//! ```
//!
//! Recognized fields are `title`, `artist`, `key` and `capo`; anything else in
//! the block is ignored.

use crate::error::ChordError;
use crate::keys::Key;
use crate::lexer::{extract_chord_tokens, map_chords, parse_line_with_chords, ParsedLine};
use serde::Deserialize;
use tracing::warn;

/// Song metadata from the frontmatter block
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SongMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Key the song is written in, as declared by the author
    pub key: Option<String>,
    pub capo: Option<u8>,
}

/// A parsed song: metadata plus the chord-annotated body
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub metadata: SongMetadata,
    pub body: String,
}

impl Song {
    /// Split off and parse the metadata block.
    ///
    /// # Errors
    /// Returns [`ChordError::MetadataError`] if the block is not valid YAML or a
    /// field has the wrong type.
    pub fn parse(source: &str) -> Result<Song, ChordError> {
        let (metadata_content, body) = extract_metadata(source);
        let metadata = match metadata_content {
            Some(content) if !content.trim().is_empty() => serde_yaml::from_str(&content)
                .map_err(|e| ChordError::MetadataError(e.to_string()))?,
            _ => SongMetadata::default(),
        };
        Ok(Song { metadata, body })
    }

    /// Chord tokens of the body in document order
    pub fn chords(&self) -> Vec<String> {
        extract_chord_tokens(&self.body)
    }

    pub fn lines(&self) -> Vec<ParsedLine> {
        self.body.lines().map(parse_line_with_chords).collect()
    }

    /// The declared key, if there is one and it names a catalog key.
    pub fn declared_key(&self) -> Option<Key> {
        let declared = self.metadata.key.as_deref()?;
        match Key::parse(declared) {
            Some(key) if key.definition().is_some() => Some(key),
            _ => {
                warn!(key = declared, "ignoring unknown declared key");
                None
            }
        }
    }
}

fn is_marker(line: &&str) -> bool {
    line.trim() == "---"
}

/// Line indices of the opening and closing `---` markers.
///
/// The block must open on the first non-blank line or close on the last one;
/// `---` pairs inside the body are section dividers.
fn metadata_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    let first = lines.iter().position(|line| !line.trim().is_empty())?;
    if is_marker(&lines[first]) {
        let close = lines[first + 1..].iter().position(is_marker)?;
        return Some((first, first + 1 + close));
    }
    let last = lines.iter().rposition(|line| !line.trim().is_empty())?;
    if is_marker(&lines[last]) {
        let open = lines[..last].iter().rposition(is_marker)?;
        return Some((open, last));
    }
    None
}

/// Split a song into its metadata block (without markers) and the remaining text.
pub(crate) fn extract_metadata(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();
    match metadata_bounds(&lines) {
        Some((start, end)) => {
            let metadata_content = lines[start + 1..end].join("\n");
            let remaining: Vec<&str> = lines[..start]
                .iter()
                .chain(lines[end + 1..].iter())
                .copied()
                .collect();
            (Some(metadata_content), remaining.join("\n"))
        }
        None => (None, source.to_string()),
    }
}

/// [`map_chords`] over everything except the metadata block, which is copied
/// through byte for byte.
pub fn map_song_chords<F>(source: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let lines: Vec<&str> = source.lines().collect();
    let bounds = metadata_bounds(&lines);
    let mut output = String::with_capacity(source.len());
    for (i, line) in source.split_inclusive('\n').enumerate() {
        match bounds {
            Some((start, end)) if (start..=end).contains(&i) => output.push_str(line),
            _ => output.push_str(&map_chords(line, &mut f)),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_metadata() {
        let source =
            "---\ntitle: Test Song\nartist: Nobody\nkey: G\ncapo: 2\n---\n[G]Hello [C]world";
        let song = Song::parse(source).unwrap();
        assert_eq!(song.metadata.title.as_deref(), Some("Test Song"));
        assert_eq!(song.metadata.artist.as_deref(), Some("Nobody"));
        assert_eq!(song.metadata.key.as_deref(), Some("G"));
        assert_eq!(song.metadata.capo, Some(2));
        assert_eq!(song.body, "[G]Hello [C]world");
        assert_eq!(song.chords(), vec!["G", "C"]);
    }

    #[test]
    fn test_metadata_at_bottom() {
        let source = "[Am]one\n[E]two\n---\ntitle: Bottom\n---";
        let song = Song::parse(source).unwrap();
        assert_eq!(song.metadata.title.as_deref(), Some("Bottom"));
        assert_eq!(song.body, "[Am]one\n[E]two");
    }

    #[test]
    fn test_section_dividers_are_body() {
        let source = "[G]Verse one [C]line\n---\n[D]Chorus [G]here\n---\n[Em]Verse two [D]line\n";
        let song = Song::parse(source).unwrap();
        assert_eq!(song.metadata, SongMetadata::default());
        assert_eq!(song.chords(), vec!["G", "C", "D", "G", "Em", "D"]);

        let lyrics = "verse lyrics\n---\nsecond verse lyrics\n---\nlast verse\n";
        let song = Song::parse(lyrics).unwrap();
        assert_eq!(song.metadata, SongMetadata::default());
    }

    #[test]
    fn test_dividers_after_frontmatter() {
        let source = "\n---\nkey: G\n---\n[G]Verse\n---\n[C]Chorus\n---\n[D]Bridge";
        let song = Song::parse(source).unwrap();
        assert_eq!(song.metadata.key.as_deref(), Some("G"));
        assert_eq!(song.chords(), vec!["G", "C", "D"]);
    }

    #[test]
    fn test_without_metadata() {
        let song = Song::parse("[G]Hello").unwrap();
        assert_eq!(song.metadata, SongMetadata::default());
        assert_eq!(song.body, "[G]Hello");
    }

    #[test]
    fn test_empty_and_unknown_fields() {
        let song = Song::parse("---\n---\n[G]x").unwrap();
        assert_eq!(song.metadata, SongMetadata::default());

        let song = Song::parse("---\ntempo: 120\n---\n[G]x").unwrap();
        assert_eq!(song.metadata, SongMetadata::default());
    }

    #[test]
    fn test_invalid_metadata() {
        let result = Song::parse("---\ncapo: two\n---\n[G]x");
        assert!(matches!(result, Err(ChordError::MetadataError(_))));
    }

    #[test]
    fn test_declared_key() {
        let song = Song::parse("---\nkey: Ebm\n---\n").unwrap();
        assert_eq!(song.declared_key().map(|k| k.to_string()).as_deref(), Some("Ebm"));

        let song = Song::parse("---\nkey: H\n---\n").unwrap();
        assert_eq!(song.declared_key(), None);
    }

    #[test]
    fn test_lines() {
        let song = Song::parse("[G]Hello\n\n[C]world[D]").unwrap();
        let lines = song.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].lyrics, "");
        assert_eq!(lines[2].chords[1].position, 5);
    }

    #[test]
    fn test_map_song_chords_skips_metadata() {
        let source = "---\ntags: [G, C]\n---\n[G]Hello\n";
        let mapped = map_song_chords(source, |c| format!("{}!", c));
        assert_eq!(mapped, "---\ntags: [G, C]\n---\n[G!]Hello\n");

        let source = "[G]Verse\n---\n[D]Chorus\n---\n[Em]Verse\n";
        let mapped = map_song_chords(source, |c| format!("{}!", c));
        assert_eq!(mapped, "[G!]Verse\n---\n[D!]Chorus\n---\n[Em!]Verse\n");
    }
}
