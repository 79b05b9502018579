//! Heuristic detectors for text mangled by broken font embedding or encoding.
//!
//! Each detector is a character-class pattern. A match anywhere in the extracted text means
//! an ATS would index corrupted tokens.

use std::sync::OnceLock;

use regex::Regex;

pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Snippets reported per garbled-text issue.
pub const MAX_SNIPPETS: usize = 3;
const SNIPPET_CHARS: usize = 24;

pub struct GarbleDetector {
    pub name: &'static str,
    pattern: Regex,
}

fn detectors() -> &'static [GarbleDetector] {
    static DETECTORS: OnceLock<Vec<GarbleDetector>> = OnceLock::new();
    DETECTORS.get_or_init(|| {
        [
            // Three or more Latin-1 Supplement / Latin Extended letters in a row.
            ("accented_cluster", r"[\x{00C0}-\x{024F}]{3,}"),
            ("non_ascii_run", r"[^\x00-\x7F]{5,}"),
            ("question_marks", r"\?{3,}"),
            ("replacement_char", r"\x{FFFD}+"),
        ]
        .into_iter()
        .map(|(name, pattern)| GarbleDetector {
            name,
            pattern: Regex::new(pattern).expect("garble detector regex"),
        })
        .collect()
    })
}

/// A detector hit with the offending text.
#[derive(Debug, Clone, PartialEq)]
pub struct GarbleMatch {
    pub detector: &'static str,
    pub snippet: String,
}

/// Runs the detectors in order and collects every match of one detector before moving to
/// the next, stopping at `MAX_SNIPPETS` distinct snippets. An early detector can fill every slot.
pub fn find_garbled(text: &str) -> Vec<GarbleMatch> {
    let mut found: Vec<GarbleMatch> = Vec::new();
    for detector in detectors() {
        for m in detector.pattern.find_iter(text) {
            let snippet: String = m.as_str().chars().take(SNIPPET_CHARS).collect();
            if found.iter().any(|f| f.snippet == snippet) {
                continue;
            }
            found.push(GarbleMatch {
                detector: detector.name,
                snippet,
            });
            if found.len() == MAX_SNIPPETS {
                return found;
            }
        }
    }
    found
}

pub fn has_replacement_char(text: &str) -> bool {
    text.contains(REPLACEMENT_CHAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_english_text_passes() {
        let text = "Senior Engineer at Acme (2019 - 2023). Built Python services; cut costs 40%.";
        assert!(find_garbled(text).is_empty());
    }

    #[test]
    fn test_isolated_accents_pass() {
        assert!(find_garbled("Café manager in Zürich, résumé available").is_empty());
    }

    #[test]
    fn test_accented_cluster_detected() {
        let hits = find_garbled("Experience Ã¤Ã¶Ã¼ with systems");
        assert!(!hits.is_empty());
    }

    #[test]
    fn test_latin_cluster_detected_by_first_detector() {
        let hits = find_garbled("name: ÐÑÒ");
        assert_eq!(hits[0].detector, "accented_cluster");
        assert_eq!(hits[0].snippet, "ÐÑÒ");
    }

    #[test]
    fn test_non_ascii_run_detected() {
        let hits = find_garbled("Skills: ■■■■■■ Python");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].detector, "non_ascii_run");
    }

    #[test]
    fn test_question_mark_run_detected() {
        let hits = find_garbled("Managed ??? engineers");
        assert_eq!(hits[0].detector, "question_marks");
        assert!(find_garbled("Why?? Because.").is_empty());
    }

    #[test]
    fn test_replacement_char_detected() {
        let text = format!("Jane {REPLACEMENT_CHAR}oe");
        assert!(has_replacement_char(&text));
        assert_eq!(find_garbled(&text)[0].detector, "replacement_char");
    }

    #[test]
    fn test_snippets_capped_and_distinct() {
        let text = "??? ???? ????? ?????? ???????";
        let hits = find_garbled(text);
        assert_eq!(hits.len(), MAX_SNIPPETS);
        assert_eq!(hits[0].snippet, "???");
        assert_eq!(hits[1].snippet, "????");
    }

    proptest! {
        #[test]
        fn property_injected_replacement_char_always_detected(
            prefix in "[a-zA-Z ]{0,40}",
            suffix in "[a-zA-Z ]{0,40}",
        ) {
            let text = format!("{prefix}{REPLACEMENT_CHAR}{suffix}");
            prop_assert!(has_replacement_char(&text));
            prop_assert!(!find_garbled(&text).is_empty());
        }
    }
}
