use crate::keys::{find_key, Key};
use crate::pitch::{NoteName, Spelling};

/// Split `rest` into the quality/extension text and an optional slash bass.
///
/// Only a trailing `/X` where `X` is exactly a root counts as a bass; `C6/9`
/// keeps its slash in the extension.
fn split_bass(rest: &str) -> (&str, Option<NoteName>) {
    if let Some(slash) = rest.rfind('/') {
        if let Ok(bass) = rest[slash + 1..].parse::<NoteName>() {
            return (&rest[..slash], Some(bass));
        }
    }
    (rest, None)
}

/// Move a spelled note by `semitones`, spelling the result per `spelling`
fn transpose_note(note: NoteName, semitones: i32, spelling: Spelling) -> NoteName {
    note.pitch_class().transpose(semitones).spell(spelling)
}

/// Transpose a chord token by `semitones` (any sign; taken mod 12).
///
/// The root and the slash bass move by the same amount and are spelled with
/// sharps or flats according to `spelling`. The quality/extension text is kept
/// as written. Surrounding whitespace is dropped. Tokens without a root, and
/// shifts that are a multiple of 12, come back unchanged.
///
/// ```
/// use chordkey::{transpose_chord, Spelling};
///
/// assert_eq!(transpose_chord("B", 1, Spelling::Sharps), "C");
/// assert_eq!(transpose_chord("G/B", 3, Spelling::Flats), "Bb/D");
/// assert_eq!(transpose_chord("F#m7", -2, Spelling::Sharps), "Em7");
/// ```
pub fn transpose_chord(chord: &str, semitones: i32, spelling: Spelling) -> String {
    let semitones = semitones.rem_euclid(12);
    if chord.is_empty() || semitones == 0 {
        return chord.to_string();
    }
    let Some((root, rest)) = NoteName::split_prefix(chord.trim()) else {
        return chord.to_string();
    };

    let (body, bass) = split_bass(rest);
    let mut result = format!("{}{}", transpose_note(root, semitones, spelling), body);
    if let Some(bass) = bass {
        result.push('/');
        result.push_str(&transpose_note(bass, semitones, spelling).to_string());
    }
    result
}

/// Upward distance in semitones (0..12) from one key's tonic to another's.
///
/// A trailing `m` is ignored, so `Am` to `C` is 3. Unknown keys give 0.
pub fn semitones_between_keys(from_key: &str, to_key: &str) -> u8 {
    match (key_tonic(from_key), key_tonic(to_key)) {
        (Some(from), Some(to)) => to.pitch_class().interval_from(from.pitch_class()),
        _ => 0,
    }
}

fn key_tonic(key: &str) -> Option<NoteName> {
    let key = key.trim();
    let tonic = key.strip_suffix('m').unwrap_or(key);
    tonic.parse().ok()
}

/// Transpose a key name, keeping its mode. Returns `None` for unknown keys.
///
/// ```
/// use chordkey::{transpose_key, Spelling};
///
/// assert_eq!(transpose_key("Am", 2, Spelling::Sharps).as_deref(), Some("Bm"));
/// assert_eq!(transpose_key("F", 5, Spelling::Flats).as_deref(), Some("Bb"));
/// ```
pub fn transpose_key(key: &str, semitones: i32, spelling: Spelling) -> Option<String> {
    let key = Key::parse(key)?;
    let moved = Key {
        tonic: transpose_note(key.tonic, semitones, spelling),
        mode: key.mode,
    };
    Some(moved.to_string())
}

/// Spelling conventionally used for the key reached by moving `key` by `semitones`.
///
/// Flat names are used where the catalog spells the key with flats (`Bb`, `Ebm`),
/// sharps everywhere else (`F#`, `G#m`). Unknown keys get sharps.
pub fn spelling_after(key: &str, semitones: i32) -> Spelling {
    match transpose_key(key, semitones, Spelling::Flats) {
        Some(target) if find_key(&target).is_some() => Spelling::for_key(&target),
        _ => Spelling::Sharps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octave_wraparound() {
        assert_eq!(transpose_chord("B", 1, Spelling::Sharps), "C");
        assert_eq!(transpose_chord("B", 1, Spelling::Flats), "C");
        assert_eq!(transpose_chord("C", -1, Spelling::Sharps), "B");
        assert_eq!(transpose_chord("C", -1, Spelling::Flats), "B");
        assert_eq!(transpose_chord("A", 14, Spelling::Sharps), "B");
    }

    #[test]
    fn test_spelling_preference() {
        assert_eq!(transpose_chord("C", 1, Spelling::Sharps), "C#");
        assert_eq!(transpose_chord("C", 1, Spelling::Flats), "Db");
        assert_eq!(transpose_chord("Em", 6, Spelling::Sharps), "A#m");
        assert_eq!(transpose_chord("Em", 6, Spelling::Flats), "Bbm");
    }

    #[test]
    fn test_extensions_and_bass() {
        assert_eq!(transpose_chord("Cmaj7", 2, Spelling::Sharps), "Dmaj7");
        assert_eq!(transpose_chord("Am7/G", 2, Spelling::Sharps), "Bm7/A");
        assert_eq!(transpose_chord("D/F#", 1, Spelling::Flats), "Eb/G");
        assert_eq!(transpose_chord("C6/9", 2, Spelling::Sharps), "D6/9");
        assert_eq!(transpose_chord("Bbdim", 2, Spelling::Flats), "Cdim");
    }

    #[test]
    fn test_padded_tokens() {
        assert_eq!(transpose_chord(" D", 2, Spelling::Sharps), "E");
        assert_eq!(transpose_chord("Am7/G ", 2, Spelling::Sharps), "Bm7/A");
        assert_eq!(transpose_chord(" ", 2, Spelling::Sharps), " ");
    }

    #[test]
    fn test_noop_cases() {
        assert_eq!(transpose_chord("", 3, Spelling::Sharps), "");
        assert_eq!(transpose_chord("G", 0, Spelling::Sharps), "G");
        assert_eq!(transpose_chord("G", 12, Spelling::Flats), "G");
        assert_eq!(transpose_chord("C#", 0, Spelling::Flats), "C#");
        assert_eq!(transpose_chord("N.C.", 5, Spelling::Sharps), "N.C.");
    }

    #[test]
    fn test_round_trip_keeps_pitch_classes() {
        let chords = ["C", "C#m7", "Eb/G", "F#dim", "Abmaj7", "B7/D#", "Gsus4"];
        for chord in chords {
            for n in -13..=13 {
                for spelling in [Spelling::Sharps, Spelling::Flats] {
                    let there = transpose_chord(chord, n, spelling);
                    let back = transpose_chord(&there, -n, spelling);
                    let original = crate::Chord::parse(chord).unwrap();
                    let returned = crate::Chord::parse(&back).unwrap();
                    assert_eq!(
                        returned.root.pitch_class(),
                        original.root.pitch_class(),
                        "{} by {}",
                        chord,
                        n
                    );
                    assert_eq!(
                        returned.bass.map(|b| b.pitch_class()),
                        original.bass.map(|b| b.pitch_class())
                    );
                    assert_eq!(returned.extension, original.extension);
                }
            }
        }
    }

    #[test]
    fn test_semitones_between_keys() {
        assert_eq!(semitones_between_keys("C", "D"), 2);
        assert_eq!(semitones_between_keys("D", "C"), 10);
        assert_eq!(semitones_between_keys("Am", "C"), 3);
        assert_eq!(semitones_between_keys("F#m", "Gb"), 0);
        assert_eq!(semitones_between_keys("X", "C"), 0);
        assert_eq!(semitones_between_keys("C", ""), 0);
    }

    #[test]
    fn test_transpose_key() {
        assert_eq!(transpose_key("G", 2, Spelling::Sharps).as_deref(), Some("A"));
        assert_eq!(transpose_key("Em", 1, Spelling::Flats).as_deref(), Some("Fm"));
        assert_eq!(transpose_key("E", 1, Spelling::Sharps).as_deref(), Some("F"));
        assert_eq!(transpose_key("Cmaj", 1, Spelling::Sharps), None);
    }

    #[test]
    fn test_spelling_after() {
        assert_eq!(spelling_after("G", 3), Spelling::Flats); // Bb
        assert_eq!(spelling_after("G", 2), Spelling::Sharps); // A
        assert_eq!(spelling_after("D", 4), Spelling::Sharps); // F#, not Gb
        assert_eq!(spelling_after("Em", 4), Spelling::Sharps); // G#m, not Abm
        assert_eq!(spelling_after("Am", 6), Spelling::Flats); // Ebm
        assert_eq!(spelling_after("Am", -2), Spelling::Flats); // Gm
        assert_eq!(spelling_after("Am", -5), Spelling::Sharps); // Em
        assert_eq!(spelling_after("?", 1), Spelling::Sharps);
    }
}
