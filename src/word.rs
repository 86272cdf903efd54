//! Word & canonical form.
//!
//! Canonicalization: fold to lowercase letters, strip diacritics (NFKD
//! decomposition, drop combining marks — the same algorithm a corpus-prep
//! pipeline gets via Python's `unicodedata.normalize("NFKD",
//! ...)`), frame with the word-boundary symbol `_`, and map any remaining
//! non-letter character to the punctuation symbol `'`.

use unicode_normalization::UnicodeNormalization;

/// A wordlist entry: its original spelling, canonical form, and score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    original: String,
    canonical: String,
    score: i64,
}

impl Word {
    /// Builds a `Word` from its original spelling and score, computing the
    /// canonical form.
    ///
    /// Returns `None` if the canonical form would be empty (e.g. an
    /// all-digit string, or a string with no representable symbols at all)
    /// — such entries are rejected by the wordlist at ingest.
    pub fn new(original: impl Into<String>, score: i64) -> Option<Word> {
        let original = original.into();
        let canonical = canonicalize(&original)?;
        Some(Word { original, canonical, score })
    }

    /// The word's original spelling, as read from the source.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The word's canonical form: `_`-framed, lowercase letters and `'`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The word's opaque score, as loaded from the wordlist file.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// The canonical form with its leading and trailing `_` stripped.
    ///
    /// Used by the combo engine to concatenate tuple components
    /// without duplicating word-boundary markers between them.
    pub fn core(&self) -> &str {
        &self.canonical[1..self.canonical.len() - 1]
    }
}

/// Computes the canonical form of an arbitrary input string, or `None` if
/// the result would be empty.
///
/// Idempotent: `canonicalize(canonicalize(w).unwrap()) == canonicalize(w)`
/// for any `w` that canonicalizes successfully.
pub fn canonicalize(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('_');
    let mut any_letter = false;
    let mut last_was_boundary = true;
    for ch in strip_diacritics(input) {
        let mapped = map_char(ch);
        match mapped {
            Mapped::Letter(c) => {
                any_letter = true;
                out.push(c);
                last_was_boundary = false;
            }
            Mapped::Boundary => {
                if !last_was_boundary {
                    out.push('_');
                    last_was_boundary = true;
                }
            }
            Mapped::Punct => {
                out.push('\'');
                last_was_boundary = false;
            }
            Mapped::Reject => return None,
            Mapped::Ignore => {}
        }
    }
    if !any_letter {
        return None;
    }
    if !out.ends_with('_') {
        out.push('_');
    }
    Some(out)
}

enum Mapped {
    Letter(char),
    Boundary,
    Punct,
    /// A digit: the whole word is rejected, generalizing the "all-digit
    /// strings are rejected" rule to any digit appearing anywhere in the
    /// word.
    Reject,
    /// Punctuation with no canonical representation (neither a boundary
    /// nor the internal-punctuation marker): dropped rather than kept,
    /// e.g. smart quotes already folded away by NFKD.
    Ignore,
}

fn map_char(ch: char) -> Mapped {
    if ch.is_ascii_digit() {
        return Mapped::Reject;
    }
    if ch.is_ascii_alphabetic() {
        return Mapped::Letter(ch.to_ascii_lowercase());
    }
    match ch {
        ' ' | '\t' | '\n' | '\r' | '-' | '_' | '/' => Mapped::Boundary,
        '\'' | '\u{2019}' => Mapped::Punct,
        _ => Mapped::Ignore,
    }
}

fn strip_diacritics(input: &str) -> impl Iterator<Item = char> + '_ {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
}

/// Unicode combining marks (general categories Mn, Mc, Me) are exactly the
/// codepoints NFKD decomposition splits diacritics into; dropping them
/// leaves the base letter behind (e.g. `é` -> `e`).
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32,
        0x0300..=0x036F // Combining Diacritical Marks
        | 0x1AB0..=0x1AFF // Combining Diacritical Marks Extended
        | 0x1DC0..=0x1DFF // Combining Diacritical Marks Supplement
        | 0x20D0..=0x20FF // Combining Diacritical Marks for Symbols
        | 0xFE20..=0xFE2F // Combining Half Marks
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_simple_word() {
        assert_eq!(canonicalize("hello").as_deref(), Some("_hello_"));
    }

    #[test]
    fn canonicalizes_punctuation_and_case() {
        assert_eq!(canonicalize("Hello, world!").as_deref(), Some("_hello'world_"));
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(canonicalize("café").as_deref(), Some("_cafe_"));
    }

    #[test]
    fn rejects_all_digit_words() {
        assert_eq!(canonicalize("1234"), None);
    }

    #[test]
    fn rejects_words_with_embedded_digits() {
        assert_eq!(canonicalize("w1nner"), None);
    }

    #[test]
    fn rejects_empty_after_stripping() {
        assert_eq!(canonicalize("!!!"), None);
    }

    #[test]
    fn collapses_internal_whitespace_to_single_boundary() {
        assert_eq!(canonicalize("new   york").as_deref(), Some("_new_york_"));
    }

    #[test]
    fn idempotent() {
        let once = canonicalize("Hello, world!").unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn core_strips_boundary_markers() {
        let w = Word::new("Hello, world!", 0).unwrap();
        assert_eq!(w.canonical(), "_hello'world_");
        assert_eq!(w.core(), "hello'world");
    }

    #[test]
    fn word_rejects_unusable_entries() {
        assert!(Word::new("1234", 5).is_none());
        assert!(Word::new("hello", 5).is_some());
    }

    #[quickcheck_macros::quickcheck]
    fn canonicalize_is_idempotent(s: String) -> bool {
        match canonicalize(&s) {
            None => true,
            Some(once) => Some(once.clone()) == canonicalize(&once),
        }
    }
}
