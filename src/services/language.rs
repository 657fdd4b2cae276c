// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort language guessing for post bodies.
//!
//! The detected tag is metadata only; nothing filters on it. Detection
//! that is unknown, unreliable, or implausible stores an empty tag.

/// Longest tag the posts table accepts; anything longer is treated as a
/// detector malfunction and cleared.
const MAX_TAG_LEN: usize = 5;

/// Guess the language of `text`, returning an ISO 639-3 code such as
/// `"eng"`, or an empty string when no reliable guess exists.
pub fn detect(text: &str) -> String {
    match whatlang::detect(text) {
        Some(info) if info.is_reliable() => normalize_tag(info.lang().code()),
        _ => String::new(),
    }
}

/// Clamp a raw detector tag to the stored form: `"UNKNOWN"` (any case),
/// whitespace, and over-long tags all collapse to the empty string.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() || tag.eq_ignore_ascii_case("unknown") || tag.len() > MAX_TAG_LEN {
        return String::new();
    }
    tag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_plausible_tags() {
        assert_eq!(normalize_tag("en"), "en");
        assert_eq!(normalize_tag("eng"), "eng");
        assert_eq!(normalize_tag(" ru "), "ru");
    }

    #[test]
    fn test_normalize_clears_unknown() {
        assert_eq!(normalize_tag("UNKNOWN"), "");
        assert_eq!(normalize_tag("unknown"), "");
        assert_eq!(normalize_tag(""), "");
        assert_eq!(normalize_tag("   "), "");
    }

    #[test]
    fn test_normalize_clears_overlong_tags() {
        assert_eq!(normalize_tag("cmn-Hant"), "");
        assert_eq!(normalize_tag("x-klingon"), "");
    }

    #[test]
    fn test_detect_empty_text() {
        assert_eq!(detect(""), "");
    }

    #[test]
    fn test_detect_english_paragraph() {
        let text = "The quick brown fox jumps over the lazy dog, and then it \
                    keeps on running through the quiet green forest until the \
                    evening light fades away behind the hills.";
        assert_eq!(detect(text), "eng");
    }

    #[test]
    fn test_detect_result_always_fits_column() {
        for text in ["hi", "12345 67890", "??!", "Ĉu vi ne volas eklerni Esperanton?"] {
            assert!(detect(text).len() <= MAX_TAG_LEN);
        }
    }
}
