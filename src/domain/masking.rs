//! Deterministic obfuscation of flagged vocabulary.
//!
//! Terms are replaced by visually similar spellings that survive automated
//! keyword filters while remaining readable.

use super::language::Language;

const ARABIC_TERMS: &[(&str, &str)] = &[
    ("الإبادة الجماعية", "الإبـ ـادة الجمـ ـاعية"),
    ("إسرائيل", "إسـ ـرائيل"),
    ("إسرائيلية", "إسـ ـرائيلية"),
    ("إسرائيلي", "إسـ ـرائيلي"),
    ("صهيوني", "صهـ ـيوني"),
    ("صهيونية", "صهـ ـيونية"),
    ("احتلال", "احتـ ـلال"),
    ("مجزرة", "مـ ـجزرة"),
    ("قوات الاحتلال", "قـ ـوات الاحتـ ـلال"),
    ("الجيش الإسرائيلي", "الجـ ـيش الإسـ ـرائيلي"),
    ("جرائم الحرب", "جرـ ـائم الحرب"),
    ("التطهير العرقي", "التطهـ ـير العرقي"),
];

const ENGLISH_TERMS: &[(&str, &str)] = &[
    ("genocide", "ɢęиσƈιđę"),
    ("Israel", "Įşŕǻęł"),
    ("Israeli", "Įşŕǻęłı"),
    ("Zionist", "Źıøиıŝŧ"),
    ("Zionism", "Źıøиıŝŧıƈ"),
    ("occupation", "Øƈƈųƥǻŧıøи"),
    ("massacre", "Mǻššǻƈŕę"),
    ("war crimes", "Ŵǻř ƈŕıɱęš"),
    ("ethnic cleansing", "ęŧħиıƈ ƈłęǻиšıиɠ"),
    ("apartheid", "ǻƥǻřŧħęıđ"),
    ("settlers", "šęŧŧłęřš"),
    ("colonization", "ƈøłøиıżǻŧıøи"),
];

fn terms_for(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Ar => ARABIC_TERMS,
        Language::En => ENGLISH_TERMS,
    }
}

/// Mask `text` with the dictionary of `language`.
///
/// Entries are applied one after another in table order, each replacing
/// every case-sensitive occurrence in the output of the previous one. An
/// earlier entry therefore claims any later entry that contains it.
pub fn mask_sensitive_terms(text: &str, language: Language) -> String {
    terms_for(language)
        .iter()
        .fold(text.to_string(), |masked, (term, replacement)| {
            masked.replace(term, replacement)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_english_terms() {
        let masked = mask_sensitive_terms("Reports of genocide and massacre.", Language::En);
        assert_eq!(masked, "Reports of ɢęиσƈιđę and Mǻššǻƈŕę.");
    }

    #[test]
    fn earlier_english_entry_claims_longer_term() {
        // "Israel" precedes "Israeli", so only the stem is replaced
        assert_eq!(
            mask_sensitive_terms("Israeli settlers", Language::En),
            "Įşŕǻęłi šęŧŧłęřš"
        );
        assert_eq!(mask_sensitive_terms("Israel", Language::En), "Įşŕǻęł");
    }

    #[test]
    fn zionism_keeps_its_own_entry() {
        // "Zionist" is not a substring of "Zionism"
        assert_eq!(
            mask_sensitive_terms("Zionist and Zionism", Language::En),
            "Źıøиıŝŧ and Źıøиıŝŧıƈ"
        );
    }

    #[test]
    fn english_matching_is_case_sensitive() {
        assert_eq!(
            mask_sensitive_terms("GENOCIDE israel", Language::En),
            "GENOCIDE israel"
        );
    }

    #[test]
    fn multi_word_english_terms() {
        assert_eq!(
            mask_sensitive_terms("war crimes and ethnic cleansing", Language::En),
            "Ŵǻř ƈŕıɱęš and ęŧħиıƈ ƈłęǻиšıиɠ"
        );
    }

    #[test]
    fn compound_arabic_term_loses_to_its_inner_term() {
        // "احتلال" is applied before "قوات الاحتلال" gets its turn
        assert_eq!(
            mask_sensitive_terms("انسحبت قوات الاحتلال", Language::Ar),
            "انسحبت قوات الاحتـ ـلال"
        );
        assert_eq!(
            mask_sensitive_terms("الجيش الإسرائيلي", Language::Ar),
            "الجيش الإسـ ـرائيلي"
        );
    }

    #[test]
    fn arabic_single_terms() {
        assert_eq!(mask_sensitive_terms("مجزرة", Language::Ar), "مـ ـجزرة");
        assert_eq!(mask_sensitive_terms("إسرائيلية", Language::Ar), "إسـ ـرائيلية");
        assert_eq!(
            mask_sensitive_terms("الإبادة الجماعية", Language::Ar),
            "الإبـ ـادة الجمـ ـاعية"
        );
    }

    #[test]
    fn dictionaries_are_language_scoped() {
        assert_eq!(mask_sensitive_terms("genocide", Language::Ar), "genocide");
        assert_eq!(mask_sensitive_terms("مجزرة", Language::En), "مجزرة");
    }

    #[test]
    fn unflagged_text_is_untouched() {
        let text = "A calm afternoon by the sea.";
        assert_eq!(mask_sensitive_terms(text, Language::En), text);
    }

    #[test]
    fn masking_is_idempotent() {
        let once = mask_sensitive_terms("occupation", Language::En);
        assert_eq!(mask_sensitive_terms(&once, Language::En), once);
    }
}
