//! Compiled matchers over the vocabulary tables.
//!
//! Every pattern is built from escaped table entries, once per process, and
//! matches case-insensitively.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::vocabulary::{
    CONDITION_QUALIFIERS, CONJUNCTION_SEPARATORS, MOTION_TERMS, NORMALIZED_LEADING_PREFIX,
    PUNCTUATION_SEPARATORS, SEMANTIC_NORMALIZATION, SLOT_PREFIXES, SLOT_SUFFIXES,
};

/// One row of the semantic normalization table.
pub(crate) struct NormalizationRule {
    pattern: Regex,
    replacement: &'static str,
    /// Where the key sits inside its own replacement, if it does.
    key_offset: Option<usize>,
}

impl NormalizationRule {
    fn new(key: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("(?i){}", regex::escape(key)))?,
            replacement,
            key_offset: replacement
                .to_ascii_lowercase()
                .find(&key.to_ascii_lowercase()),
        })
    }

    /// Replaces every occurrence of the key, except where the text around
    /// it already reads as the replacement.
    pub(crate) fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let Some(found) = caps.get(0) else {
                    return String::new();
                };
                if self.already_canonical(text, found.start()) {
                    found.as_str().to_string()
                } else {
                    self.replacement.to_string()
                }
            })
            .into_owned()
    }

    fn already_canonical(&self, text: &str, match_start: usize) -> bool {
        let Some(offset) = self.key_offset else {
            return false;
        };
        let Some(start) = match_start.checked_sub(offset) else {
            return false;
        };
        text.get(start..start + self.replacement.len())
            .map_or(false, |window| window.eq_ignore_ascii_case(self.replacement))
    }
}

pub(crate) struct Patterns {
    pub(crate) motion_terms: Regex,
    pub(crate) condition_qualifiers: Regex,
    pub(crate) slot_prefixes: Regex,
    pub(crate) slot_suffix: Regex,
    pub(crate) leading_existing: Regex,
    pub(crate) separators: Regex,
    pub(crate) normalization: Vec<NormalizationRule>,
}

impl Patterns {
    fn build() -> Result<Self, regex::Error> {
        let prefixes = SLOT_PREFIXES
            .iter()
            .map(|prefix| bounded(prefix))
            .collect::<Vec<String>>()
            .join("|");
        let separators = PUNCTUATION_SEPARATORS
            .iter()
            .map(|ch| regex::escape(&ch.to_string()))
            .chain(CONJUNCTION_SEPARATORS.iter().map(|word| regex::escape(word)))
            .collect::<Vec<String>>()
            .join("|");
        Ok(Self {
            motion_terms: whole_words(MOTION_TERMS)?,
            condition_qualifiers: whole_words(CONDITION_QUALIFIERS)?,
            slot_prefixes: Regex::new(&format!(r"(?i)^(?:(?:{prefixes})[\s:]*)+"))?,
            slot_suffix: Regex::new(&format!(
                r"(?i)\b(?:{})$",
                escaped_alternation(SLOT_SUFFIXES)
            ))?,
            leading_existing: Regex::new(&format!(
                r"(?i)^{}\s*",
                bounded(NORMALIZED_LEADING_PREFIX.trim_end())
            ))?,
            separators: Regex::new(&format!("(?i){separators}"))?,
            normalization: SEMANTIC_NORMALIZATION
                .iter()
                .map(|&(key, replacement)| NormalizationRule::new(key, replacement))
                .collect::<Result<Vec<NormalizationRule>, regex::Error>>()?,
        })
    }
}

/// The shared matchers, or `None` if the vocabulary failed to compile.
pub(crate) fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns::build().ok()).as_ref()
}

fn escaped_alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<String>>()
        .join("|")
}

fn whole_words(words: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b(?:{})\b", escaped_alternation(words)))
}

/// Escapes `word` and requires a word boundary after it when it ends in a
/// word character, so `current` does not eat the start of `currently`.
fn bounded(word: &str) -> String {
    let escaped = regex::escape(word);
    if word.chars().next_back().map_or(false, char::is_alphanumeric) {
        format!(r"{escaped}\b")
    } else {
        escaped
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

pub(crate) fn contains_any_ignore_case(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> &'static Patterns {
        patterns().expect("vocabulary patterns compile")
    }

    #[test]
    fn whole_word_removal_respects_boundaries() {
        let motion = &compiled().motion_terms;
        assert_eq!(motion.replace_all("Spinning gold fan", ""), " gold fan");
        assert_eq!(motion.replace_all("spinning-top fan", ""), "-top fan");
        assert_eq!(motion.replace_all("Movingly carved", ""), "Movingly carved");

        let qualifiers = &compiled().condition_qualifiers;
        assert_eq!(qualifiers.replace_all("bold, OLD tiles", ""), "bold,  tiles");
        assert_eq!(qualifiers.replace_all("città old è", ""), "città  è");
    }

    #[test]
    fn prefixes_strip_repeatedly_on_word_boundaries() {
        let prefixes = &compiled().slot_prefixes;
        assert_eq!(
            prefixes.replace("User constraints: existing Original oak floor", ""),
            "oak floor"
        );
        assert_eq!(prefixes.replace("Currently", ""), "Currently");
        assert_eq!(prefixes.replace("Originale cotto", ""), "cotto");
    }

    #[test]
    fn suffix_needs_word_boundary() {
        let suffix = &compiled().slot_suffix;
        assert_eq!(suffix.replace("Oak floor finish", ""), "Oak floor ");
        assert_eq!(suffix.replace("Superstructure", ""), "Superstructure");
        assert_eq!(suffix.replace("Surface", ""), "");
        assert_eq!(suffix.replace("finish oak floor", ""), "finish oak floor");
    }

    #[test]
    fn separators_split_case_insensitively() {
        let parts: Vec<&str> = compiled().separators.split("a AND b, c; d e f").collect();
        assert_eq!(parts, vec!["a", "b", " c", " d", "f"]);
    }

    #[test]
    fn normalization_rule_replaces_every_occurrence() -> Result<(), regex::Error> {
        let rule = NormalizationRule::new("floor surface", "floor material finish")?;
        assert_eq!(
            rule.apply("Floor Surface and floor surface"),
            "floor material finish and floor material finish"
        );
        Ok(())
    }

    #[test]
    fn normalization_rule_leaves_its_own_output_alone() -> Result<(), regex::Error> {
        let rule = NormalizationRule::new("wood plank floor", "hardwood plank floor")?;
        assert_eq!(rule.apply("Hardwood plank floor"), "Hardwood plank floor");
        assert_eq!(rule.apply("wood plank floor"), "hardwood plank floor");

        let rule = NormalizationRule::new("exposed brick", "exposed brick wall")?;
        assert_eq!(rule.apply("Exposed brick wall"), "Exposed brick wall");
        assert_eq!(
            rule.apply("exposed brick and exposed brick wall"),
            "exposed brick wall and exposed brick wall"
        );
        Ok(())
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("èlite"), "Èlite");
    }
}
