//! # Error Types
//!
//! The analysis engine itself never fails: unparsable chords are skipped or read
//! as major, and unknown keys leave the input unchanged. `ChordError` is only
//! returned by the strict surfaces built on top of it:
//!
//! - `InvalidChord` - `Chord::from_str` / `NoteName::from_str` on a token without a root
//! - `UnknownKey` - `Key::from_str` on a name that is not a key
//! - `MetadataError` - song frontmatter that is not valid YAML
//! - `ConfigError` - detector configuration that does not load or validate
//!
//! ## Usage
//! ```rust
//! use chordkey::{analyze, ChordError};
//!
//! let source = "---\ntitle: [unclosed\n---\n[G]Hello";
//! match analyze(source) {
//!     Ok(analysis) => println!("{:?}", analysis.effective_key),
//!     Err(ChordError::MetadataError(message)) => eprintln!("Bad frontmatter: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// The token does not start with a pitch letter A-G.
    ///
    /// # Example
    /// ```
    /// # use chordkey::ChordError;
    /// let err = ChordError::InvalidChord("Hm7".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord: Hm7");
    /// ```
    #[error("Invalid chord: {0}")]
    InvalidChord(String),

    /// The name does not resolve to a major or minor key.
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// Invalid song frontmatter.
    ///
    /// # Example
    /// ```
    /// # use chordkey::ChordError;
    /// let err = ChordError::MetadataError("capo must be a number".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: capo must be a number");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// Invalid key detector configuration.
    #[error("Invalid detector config: {0}")]
    ConfigError(String),
}
