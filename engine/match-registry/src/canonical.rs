//! Team-name canonicalization
//!
//! The upstream feed spells the same club in several ways: with or without a
//! club-affiliation word ("הפועל", "הפ׳", "מכבי"), with Hebrew geresh marks,
//! with invisible direction marks, or with an administrative suffix attached to
//! a single fixture. [`Canonicalizer::canonicalize`] produces the display form
//! and [`match_key`] the harsher structural form used for deduplication.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// Leading tokens meaning "the club" / "the team". Order matters: the first
/// alternative that matches at the start of the name is stripped.
pub const CLUB_PREFIXES: &[&str] =
    &["הפועל", "הפ", "ה.", "ה", "מכבי", "מ.", "מ.ס.", "מ.כ.", "מ "];

/// Trailing phrases that describe the fixture rather than the team
/// ("צו פיוס" = by court order).
pub const IDENTITY_SUFFIXES: &[&str] = &["צו פיוס"];

lazy_static! {
    static ref DOT_SPACING: Regex = Regex::new(r"\s*\.\s*").expect("valid dot pattern");
    static ref DEFAULT_CANONICALIZER: Canonicalizer =
        Canonicalizer::new(&NameVocabulary::default()).expect("default vocabulary compiles");
}

/// Reviewable word lists driving prefix and suffix stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVocabulary {
    /// Club-affiliation prefixes, tried in order
    pub club_prefixes: Vec<String>,

    /// Non-identity suffix phrases; inner spaces match any amount of whitespace
    pub identity_suffixes: Vec<String>,
}

impl Default for NameVocabulary {
    fn default() -> Self {
        Self {
            club_prefixes: CLUB_PREFIXES.iter().map(|p| p.to_string()).collect(),
            identity_suffixes: IDENTITY_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Compiled form of a [`NameVocabulary`]
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    prefix: Option<Regex>,
    suffix: Option<Regex>,
}

impl Canonicalizer {
    /// Compile the vocabulary into anchored prefix/suffix patterns
    pub fn new(vocabulary: &NameVocabulary) -> Result<Self, regex::Error> {
        let prefix = if vocabulary.club_prefixes.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = vocabulary
                .club_prefixes
                .iter()
                .map(|p| regex::escape(p).replace(' ', r"\s"))
                .collect();
            Some(Regex::new(&format!(r"^(?:{})\s*", alternatives.join("|")))?)
        };

        let suffix = if vocabulary.identity_suffixes.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = vocabulary
                .identity_suffixes
                .iter()
                .map(|s| s.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s*"))
                .collect();
            Some(Regex::new(&format!(r"\s*(?:{})\s*$", alternatives.join("|")))?)
        };

        Ok(Self { prefix, suffix })
    }

    /// Normalize a free-text team name into its display identity.
    ///
    /// Total and deterministic: any input yields a (possibly empty) string.
    pub fn canonicalize(&self, raw: &str) -> String {
        let unified: String = raw
            .chars()
            .map(|c| {
                if is_space_variant(c) {
                    ' '
                } else if is_dash_variant(c) {
                    '-'
                } else {
                    c
                }
            })
            .filter(|c| !is_quote_mark(*c))
            .collect();

        let dotted = DOT_SPACING.replace_all(&unified, ".");
        let trimmed = dotted.trim();

        let unprefixed = match &self.prefix {
            Some(re) => re.replace(trimmed, ""),
            None => Cow::Borrowed(trimmed),
        };

        let visible: String = unprefixed.chars().filter(|c| !is_invisible_mark(*c)).collect();

        let unsuffixed = match &self.suffix {
            Some(re) => re.replace(&visible, ""),
            None => Cow::Borrowed(visible.as_str()),
        };

        unsuffixed.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Structural key: the display form with every remaining dot, quote,
    /// dash and whitespace character removed
    pub fn match_key(&self, raw: &str) -> String {
        self.canonicalize(raw).chars().filter(|c| !is_key_noise(*c)).collect()
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        DEFAULT_CANONICALIZER.clone()
    }
}

/// Canonicalize with the default vocabulary
pub fn canonicalize(raw: &str) -> String {
    DEFAULT_CANONICALIZER.canonicalize(raw)
}

/// Match key with the default vocabulary
pub fn match_key(raw: &str) -> String {
    DEFAULT_CANONICALIZER.match_key(raw)
}

fn is_space_variant(c: char) -> bool {
    matches!(c, '\u{00a0}' | '\u{2007}' | '\u{202f}')
}

fn is_dash_variant(c: char) -> bool {
    matches!(c, '\u{2011}' | '\u{2013}' | '\u{2014}')
}

fn is_quote_mark(c: char) -> bool {
    matches!(
        c,
        '\u{05f3}' // geresh
            | '\u{05f4}' // gershayim
            | '"'
            | '\''
            | '`'
            | '\u{2018}'
            | '\u{2019}'
            | '\u{201c}'
            | '\u{201d}'
    )
}

fn is_invisible_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200b}'..='\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2060}' | '\u{2066}'..='\u{2069}' | '\u{feff}'
    )
}

fn is_key_noise(c: char) -> bool {
    c == '.' || c == '-' || c == '\u{05be}' || is_dash_variant(c) || is_quote_mark(c) || c.is_whitespace()
}
