//! Offline commands that run the pure pipeline stages locally.

use crate::cli::args::{BlurArgs, MaskArgs};
use crate::config::Config;
use crate::domain::{detect_language, mask_sensitive_terms, Language};
use crate::errors::{AppError, AppResult};
use crate::infra::clients::segmenter_for;
use crate::services::{BloodDetector, BloodService};

fn parse_language(code: &str) -> AppResult<Language> {
    match code.to_ascii_lowercase().as_str() {
        "ar" => Ok(Language::Ar),
        "en" => Ok(Language::En),
        other => Err(AppError::validation(format!(
            "Unsupported language '{}', expected 'ar' or 'en'",
            other
        ))),
    }
}

/// Print `text` with flagged terms masked.
pub fn mask(args: MaskArgs) -> AppResult<()> {
    let language = match args.lang.as_deref() {
        Some(code) => parse_language(code)?,
        None => detect_language(&args.text),
    };
    tracing::debug!(language = %language, "Masking text");
    println!("{}", mask_sensitive_terms(&args.text, language));
    Ok(())
}

/// Blur blood regions of a local file and print the output path.
pub async fn blur(args: BlurArgs, config: Config) -> AppResult<()> {
    let detector = BloodDetector::new(segmenter_for(&config)?);
    let report = detector.blur_blood_regions(&args.path).await?;
    println!("{} ({} blood regions)", report.output_path, report.blood_regions);
    Ok(())
}
