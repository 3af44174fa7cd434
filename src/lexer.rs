//! # Bracket Chord Lexer
//!
//! Splits song text written in ChordPro bracket notation into lyric text and
//! chord tokens:
//!
//! ```text
//! [G]Hello [C]world
//!  ^        ^
//!  Chord    Chord     everything else is Text
//! ```
//!
//! ## Rules
//! - A chord is `[` + one or more characters + `]` on the same line; its
//!   contents are kept verbatim (no trimming, no validation).
//! - `[]`, and a `[` with no closing `]` before the end of the line, are plain text.
//! - There is no escape for literal brackets in lyrics.
//!
//! ## Entry Points
//! - [`extract_chord_tokens`] - every chord in document order
//! - [`parse_line_with_chords`] - one line split into lyrics and positioned chords
//! - [`map_chords`] - rewrite every chord in a text, leaving the rest untouched

use serde::Serialize;

/// Token types of bracket-annotated text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Lyrics and any other text, including newlines
    Text(String),
    /// Contents of a `[...]` chord annotation
    Chord(String),
}

/// A token with its position in the source
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    pub token: Token,
    /// 1-indexed line
    pub line: usize,
    /// 1-indexed column (in characters) where the token starts
    pub column: usize,
}

/// Lexer for bracket-annotated song text
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Contents of the chord annotation starting at the current `[`, if it is one.
    fn check_chord(&self) -> Option<&'a str> {
        let rest = &self.input[self.position + 1..];
        let end = rest.find(|c: char| c == ']' || c == '\n')?;
        if rest[end..].starts_with(']') && end > 0 {
            Some(&rest[..end])
        } else {
            None
        }
    }

    pub fn tokenize(&mut self) -> Vec<LocatedToken> {
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut text_start = (self.line, self.column);

        while let Some(&c) = self.peek() {
            if c == '[' {
                if let Some(chord) = self.check_chord() {
                    if !text.is_empty() {
                        tokens.push(LocatedToken {
                            token: Token::Text(std::mem::take(&mut text)),
                            line: text_start.0,
                            column: text_start.1,
                        });
                    }
                    let (line, column) = (self.line, self.column);
                    // [ + contents + ]
                    for _ in 0..chord.chars().count() + 2 {
                        self.advance();
                    }
                    tokens.push(LocatedToken {
                        token: Token::Chord(chord.to_string()),
                        line,
                        column,
                    });
                    continue;
                }
            }

            if text.is_empty() {
                text_start = (self.line, self.column);
            }
            text.push(c);
            self.advance();
        }

        if !text.is_empty() {
            tokens.push(LocatedToken {
                token: Token::Text(text),
                line: text_start.0,
                column: text_start.1,
            });
        }
        tokens
    }
}

/// Every chord annotation in `text`, verbatim, top to bottom and left to right.
///
/// ```
/// use chordkey::extract_chord_tokens;
///
/// let text = "[G]Amazing [G7]grace\nHow [C]sweet the [G]sound";
/// assert_eq!(extract_chord_tokens(text), vec!["G", "G7", "C", "G"]);
/// ```
pub fn extract_chord_tokens(text: &str) -> Vec<String> {
    Lexer::new(text)
        .tokenize()
        .into_iter()
        .filter_map(|t| match t.token {
            Token::Chord(chord) => Some(chord),
            Token::Text(_) => None,
        })
        .collect()
}

/// A chord and the character offset in the lyrics where it belongs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordPosition {
    pub chord: String,
    pub position: usize,
}

/// A line split into its lyrics and the chords placed over them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    pub chords: Vec<ChordPosition>,
    pub lyrics: String,
}

/// Strip the chord annotations from a line, recording where each one sat.
///
/// Positions are character offsets into the stripped lyrics. A chord at the end
/// of the line sits at `lyrics.chars().count()`; back-to-back chords share a
/// position and keep their order.
///
/// ```
/// use chordkey::parse_line_with_chords;
///
/// let line = parse_line_with_chords("[G]Hello [C]world");
/// assert_eq!(line.lyrics, "Hello world");
/// assert_eq!(line.chords[1].chord, "C");
/// assert_eq!(line.chords[1].position, 6);
/// ```
pub fn parse_line_with_chords(line: &str) -> ParsedLine {
    let mut lyrics = String::new();
    let mut lyric_chars = 0;
    let mut chords = Vec::new();

    for located in Lexer::new(line).tokenize() {
        match located.token {
            Token::Text(text) => {
                lyric_chars += text.chars().count();
                lyrics.push_str(&text);
            }
            Token::Chord(chord) => chords.push(ChordPosition {
                chord,
                position: lyric_chars,
            }),
        }
    }

    ParsedLine { chords, lyrics }
}

/// Replace the contents of every chord annotation with `f(contents)`.
pub fn map_chords<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(text.len());
    for located in Lexer::new(text).tokenize() {
        match located.token {
            Token::Text(segment) => output.push_str(&segment),
            Token::Chord(chord) => {
                output.push('[');
                output.push_str(&f(&chord));
                output.push(']');
            }
        }
    }
    output
}
