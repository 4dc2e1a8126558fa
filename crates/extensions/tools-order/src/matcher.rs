//! Product text matching.
//!
//! The menu pages render display names with diacritics and decorations the
//! caller will not type ("Caffè Latte", "Caffè Americano"). Matching is
//! therefore: fold diacritics on both sides, lowercase, substring
//! containment, skip disallowed variants, first match in DOM order wins.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a display string for matching: NFD-decompose, drop combining marks,
/// lowercase.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Find the first candidate whose folded text contains the folded query and
/// none of the disallowed keywords. Returns the candidate's index.
///
/// No ranking: the first surviving match in listing order is authoritative.
pub fn find_match(query: &str, candidates: &[String], disallowed: &[&str]) -> Option<usize> {
    let folded = normalize(query);
    let needle = folded.trim();
    if needle.is_empty() {
        return None;
    }
    candidates.iter().position(|candidate| {
        let haystack = normalize(candidate);
        haystack.contains(needle) && !disallowed.iter().any(|keyword| haystack.contains(keyword))
    })
}
