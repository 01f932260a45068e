//! Heuristic Arabic/English language detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Word characters are letters, numbers and underscore. Combining marks such
// as Arabic harakat are not word characters and get stripped.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_\s]").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Short Arabic function words and particles, matched as substrings.
const ARABIC_MARKERS: &[&str] = &[
    "ال", "في", "من", "على", "أن", "إن", "إلى", "هذا", "هذه", "كان", "يكون",
];

const ENGLISH_MARKERS: &[&str] = &[
    "the", "and", "of", "to", "a", "in", "is", "it", "you", "that", "for",
];

/// Arabic share of letters above which text is treated as Arabic.
const ARABIC_RATIO_THRESHOLD: f64 = 0.3;

/// More distinct Arabic markers than this means Arabic regardless of ratio.
const ARABIC_MARKER_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Signals gathered from a text sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSignals {
    pub arabic_ratio: f64,
    pub arabic_markers: usize,
    pub english_markers: usize,
}

fn is_arabic_block(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Strip punctuation and digit runs, keeping letters and whitespace.
fn clean(text: &str) -> String {
    let without_symbols = NON_WORD.replace_all(text, "");
    DIGITS.replace_all(&without_symbols, "").into_owned()
}

/// Measure the signals for `text`. Returns `None` when nothing but
/// punctuation, digits or whitespace remains.
pub fn language_signals(text: &str) -> Option<LanguageSignals> {
    let cleaned = clean(text);
    if cleaned.trim().is_empty() {
        return None;
    }

    let total = cleaned.chars().count();
    let arabic = cleaned.chars().filter(|c| is_arabic_block(*c)).count();
    let lowered = cleaned.to_lowercase();

    Some(LanguageSignals {
        arabic_ratio: arabic as f64 / total as f64,
        arabic_markers: ARABIC_MARKERS
            .iter()
            .filter(|m| cleaned.contains(*m))
            .count(),
        english_markers: ENGLISH_MARKERS
            .iter()
            .filter(|m| lowered.contains(*m))
            .count(),
    })
}

/// Classify `text` as Arabic or English. Anything not clearly Arabic,
/// including empty input, is English.
pub fn detect_language(text: &str) -> Language {
    let Some(signals) = language_signals(text) else {
        return Language::En;
    };

    tracing::trace!(
        arabic_ratio = signals.arabic_ratio,
        arabic_markers = signals.arabic_markers,
        english_markers = signals.english_markers,
        "language signals"
    );

    if signals.arabic_ratio > ARABIC_RATIO_THRESHOLD
        || signals.arabic_markers > ARABIC_MARKER_THRESHOLD
    {
        Language::Ar
    } else {
        Language::En
    }
}
