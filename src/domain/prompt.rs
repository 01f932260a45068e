//! Rewrite prompts and LLM output cleanup.

use super::language::Language;

const ARABIC_TEMPLATE: &str = "أنت مساعد ذكي ومحايد. أعد صياغة النص التالي ليصبح مناسبًا للتواصل الاجتماعي:

المتطلبات:
1. حافظ على المعنى الأساسي ولكن بلغة محايدة وموضوعية
2. استخدم لغة دبلوماسية ومهنية
3. تجنب أي لغة عاطفية أو تحريضية
4. اكتب النص المعاد صياغته فقط بدون أي تعليقات إضافية
5. استخدم جملة أو جملتين كحد أقصى

النص الأصلي:
{input}

النص المعاد صياغته:";

const ENGLISH_TEMPLATE: &str = "You are an intelligent and neutral assistant. Rewrite the following text to make it suitable for social media:

Requirements:
1. Focus on maintain the core meaning but use neutral and objective language
2. Use diplomatic and professional language
3. Avoid any emotional or inflammatory language
4. Write only the rewritten text without any additional comments
5. Use 1-2 sentences maximum

Original text:
{input}

Rewritten text:";

/// Lead-ins models tend to echo before the rewrite, checked in this order.
pub const ANSWER_PREFIXES: &[&str] = &[
    "النص المعاد صياغته:",
    "النص الجديد:",
    "هذا النص المعاد صياغته:",
    "إليك النص المعاد صياغته:",
    "Rewritten text:",
    "New text:",
    "Here is the rewritten text:",
    "The rewritten text is:",
];

/// Build the rewrite instruction for `input` in `language`.
pub fn build_prompt(language: Language, input: &str) -> String {
    let template = match language {
        Language::Ar => ARABIC_TEMPLATE,
        Language::En => ENGLISH_TEMPLATE,
    };
    template.replacen("{input}", input, 1)
}

/// Trim the completion and drop any echoed lead-in.
///
/// Each prefix is tried once, in order, against the text left by the
/// previous step.
pub fn clean_output(raw: &str) -> String {
    ANSWER_PREFIXES
        .iter()
        .fold(raw.trim().to_string(), |text, prefix| {
            match text.strip_prefix(prefix) {
                Some(rest) => rest.trim().to_string(),
                None => text,
            }
        })
}
