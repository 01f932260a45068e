//! Appropriateness labels and the decision rules applied to model output.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::RULE_BASED_CONFIDENCE;

/// Keywords that make text inappropriate when no model is configured.
const INAPPROPRIATE_KEYWORDS: &[&str] = &["spam", "hate", "violence", "explicit"];

/// Predicted image classes containing any of these are inappropriate.
const INAPPROPRIATE_IMAGE_CLASSES: &[&str] = &["explicit", "violence", "adult"];

/// Text model label that marks toxic input.
const TOXIC_LABEL: &str = "toxic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModerationLabel {
    Appropriate,
    Inappropriate,
    Error,
}

impl ModerationLabel {
    fn from_flag(inappropriate: bool) -> Self {
        if inappropriate {
            ModerationLabel::Inappropriate
        } else {
            ModerationLabel::Appropriate
        }
    }
}

/// Outcome of a text or image classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    pub label: ModerationLabel,
    #[schema(example = 0.97)]
    pub confidence: f32,
    /// Raw class predicted by the image model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    pub fn new(label: ModerationLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence,
            predicted_class: None,
            error: None,
        }
    }

    /// A failed classification. Confidence is always zero.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            label: ModerationLabel::Error,
            confidence: 0.0,
            predicted_class: None,
            error: Some(error.into()),
        }
    }

    pub fn with_predicted_class(mut self, class: impl Into<String>) -> Self {
        self.predicted_class = Some(class.into());
        self
    }
}

/// One label/score pair returned by an inference model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Keyword fallback used when no text model is available.
pub fn classify_text_by_keywords(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let flagged = INAPPROPRIATE_KEYWORDS.iter().any(|k| lowered.contains(k));
    Classification::new(ModerationLabel::from_flag(flagged), RULE_BASED_CONFIDENCE)
}

/// Interpret text model output: the top label decides.
pub fn text_verdict(top: &LabelScore) -> Classification {
    let toxic = top.label.eq_ignore_ascii_case(TOXIC_LABEL);
    Classification::new(ModerationLabel::from_flag(toxic), top.score)
}

/// Interpret image model output: the predicted class decides.
pub fn image_verdict(top: &LabelScore) -> Classification {
    let class = top.label.to_lowercase();
    let flagged = INAPPROPRIATE_IMAGE_CLASSES.iter().any(|k| class.contains(k));
    Classification::new(ModerationLabel::from_flag(flagged), top.score)
        .with_predicted_class(top.label.clone())
}

/// Highest scoring entry, if any.
pub fn top_label(scores: &[LabelScore]) -> Option<&LabelScore> {
    scores
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(label: &str, score: f32) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn keyword_fallback_flags_case_insensitively() {
        let result = classify_text_by_keywords("This is SPAM, buy now");
        assert_eq!(result.label, ModerationLabel::Inappropriate);
        assert_eq!(result.confidence, RULE_BASED_CONFIDENCE);
    }

    #[test]
    fn keyword_fallback_matches_substrings() {
        // "hateful" contains "hate"
        assert_eq!(
            classify_text_by_keywords("a hateful remark").label,
            ModerationLabel::Inappropriate
        );
        assert_eq!(
            classify_text_by_keywords("a lovely remark").label,
            ModerationLabel::Appropriate
        );
    }

    #[test]
    fn toxic_label_is_inappropriate() {
        let verdict = text_verdict(&score("TOXIC", 0.91));
        assert_eq!(verdict.label, ModerationLabel::Inappropriate);
        assert_eq!(verdict.confidence, 0.91);
        assert_eq!(text_verdict(&score("toxic", 0.5)).label, ModerationLabel::Inappropriate);
        assert_eq!(text_verdict(&score("non-toxic", 0.8)).label, ModerationLabel::Appropriate);
    }

    #[test]
    fn image_classes_with_flagged_words() {
        let verdict = image_verdict(&score("Adult content", 0.7));
        assert_eq!(verdict.label, ModerationLabel::Inappropriate);
        assert_eq!(verdict.predicted_class.as_deref(), Some("Adult content"));

        let verdict = image_verdict(&score("golden retriever", 0.88));
        assert_eq!(verdict.label, ModerationLabel::Appropriate);
    }

    #[test]
    fn failed_classification_shape() {
        let failed = Classification::failed("Image classifier not available");
        assert_eq!(failed.label, ModerationLabel::Error);
        assert_eq!(failed.confidence, 0.0);

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["label"], "ERROR");
        assert_eq!(json["error"], "Image classifier not available");
        assert!(json.get("predicted_class").is_none());
    }

    #[test]
    fn top_label_picks_highest_score() {
        let scores = vec![score("non-toxic", 0.2), score("toxic", 0.8)];
        assert_eq!(top_label(&scores).unwrap().label, "toxic");
        assert!(top_label(&[]).is_none());
    }
}
