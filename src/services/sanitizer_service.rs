//! Text sanitization pipeline.
//!
//! detect language -> resolve model -> build prompt -> LLM completion ->
//! strip answer prefixes -> mask flagged vocabulary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{
    CONTENT_TYPE_TEXT, FALLBACK_MODEL, LLM_MAX_TOKENS, LLM_TEMPERATURE, LLM_TOP_P,
    MIN_ARABIC_REWRITE_CHARS, MODEL_PRIORITY,
};
use crate::domain::prompt::{build_prompt, clean_output};
use crate::domain::{detect_language, mask_sensitive_terms, Language, NewContent};
use crate::errors::{AppError, AppResult};
use crate::infra::clients::{CompletionRequest, LlmClient};
use crate::infra::{Cache, UnitOfWork};

pub const NEUTRALIZED_TITLE: &str = "Generated Text";
pub const SAVE_FAILED: &str = "Error saving generated content";

/// Result of `POST /generate/neutralize`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NeutralizeResponse {
    /// Rewritten and masked text
    pub result: String,
    /// Id of the stored content row
    pub content_id: i32,
}

#[async_trait]
pub trait SanitizerService: Send + Sync {
    /// Run the full pipeline without persisting anything
    async fn sanitize(&self, text: &str) -> AppResult<String>;

    /// Sanitize and store the result as the user's content
    async fn neutralize(&self, user_id: i32, text: &str) -> AppResult<NeutralizeResponse>;
}

pub struct Sanitizer<U: UnitOfWork> {
    uow: Arc<U>,
    llm: Arc<dyn LlmClient>,
    cache: Option<Cache>,
}

impl<U: UnitOfWork> Sanitizer<U> {
    pub fn new(uow: Arc<U>, llm: Arc<dyn LlmClient>, cache: Option<Cache>) -> Self {
        Self { uow, llm, cache }
    }

    /// First model in priority order the provider acknowledges.
    ///
    /// The answer is memoized in the cache; cache failures only cost a probe.
    pub async fn find_working_model(&self) -> String {
        if let Some(cache) = &self.cache {
            match cache.get_active_model().await {
                Ok(Some(model)) => return model,
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Model memo lookup failed"),
            }
        }

        for model in MODEL_PRIORITY {
            match self.llm.model_available(model).await {
                Ok(true) => {
                    tracing::debug!(model, "Resolved LLM model");
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.set_active_model(model).await {
                            tracing::warn!(error = %e, "Model memo store failed");
                        }
                    }
                    return (*model).to_string();
                }
                Ok(false) => tracing::debug!(model, "Model unavailable"),
                Err(e) => tracing::debug!(model, error = %e, "Model probe failed"),
            }
        }

        tracing::warn!(model = FALLBACK_MODEL, "No model answered, using fallback");
        FALLBACK_MODEL.to_string()
    }

    async fn forget_model(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear_active_model().await {
                tracing::warn!(error = %e, "Model memo clear failed");
            }
        }
    }
}

/// Choose what gets masked once the model has answered.
///
/// Short Arabic rewrites are treated as refusals and the input is masked instead.
pub fn finalize(language: Language, input: &str, cleaned: &str) -> String {
    match language {
        Language::Ar if cleaned.is_empty() || cleaned.chars().count() <= MIN_ARABIC_REWRITE_CHARS => {
            mask_sensitive_terms(input, language)
        }
        _ => mask_sensitive_terms(cleaned, language),
    }
}

#[async_trait]
impl<U: UnitOfWork> SanitizerService for Sanitizer<U> {
    async fn sanitize(&self, text: &str) -> AppResult<String> {
        if text.trim().is_empty() {
            return Err(AppError::validation("Text must not be empty"));
        }

        let language = detect_language(text);
        let model = self.find_working_model().await;
        tracing::info!(language = %language, model = %model, "Sanitizing text");

        let request = CompletionRequest {
            model,
            prompt: build_prompt(language, text),
            max_tokens: LLM_MAX_TOKENS,
            temperature: LLM_TEMPERATURE,
            top_p: LLM_TOP_P,
        };

        let raw = match self.llm.complete(request).await {
            Ok(raw) => raw,
            Err(e) => {
                self.forget_model().await;
                return Err(AppError::upstream(format!("Groq generation failed: {}", e)));
            }
        };

        Ok(finalize(language, text, &clean_output(&raw)))
    }

    async fn neutralize(&self, user_id: i32, text: &str) -> AppResult<NeutralizeResponse> {
        let result = self.sanitize(text).await?;

        let content = NewContent::new(CONTENT_TYPE_TEXT)
            .title(NEUTRALIZED_TITLE)
            .text(result.as_str())
            .metadata(json!({ "original_text": text, "type": "neutralized" }));

        let saved = self
            .uow
            .contents()
            .create(user_id, content)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "Saving neutralized text failed");
                AppError::bad_request(SAVE_FAILED)
            })?;

        Ok(NeutralizeResponse {
            result,
            content_id: saved.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_arabic_rewrite_masks_input() {
        let input = "الجيش الإسرائيلي في المدينة";
        let out = finalize(Language::Ar, input, "لا");
        assert_eq!(out, mask_sensitive_terms(input, Language::Ar));
    }

    #[test]
    fn long_arabic_rewrite_is_masked() {
        let cleaned = "قوات الاحتلال دخلت المدينة اليوم";
        let out = finalize(Language::Ar, "ignored input", cleaned);
        assert_eq!(out, mask_sensitive_terms(cleaned, Language::Ar));
        assert!(!out.contains("قوات الاحتلال"));
    }

    #[test]
    fn english_always_masks_result() {
        let out = finalize(Language::En, "Israel input", "");
        assert_eq!(out, "");
        let out = finalize(Language::En, "x", "The genocide");
        assert_eq!(out, "The ɢęиσƈιđę");
    }
}
