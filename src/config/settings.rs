//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_CORS_ORIGINS, DEFAULT_DATABASE_URL, DEFAULT_GROQ_BASE_URL, DEFAULT_HF_BASE_URL,
    DEFAULT_IMAGE_MODEL, DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_MEDIA_DIR,
    DEFAULT_POLLINATIONS_BASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TEXT_MODEL, MIN_JWT_SECRET_LENGTH,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    groq_api_key: Option<String>,
    pub groq_base_url: String,
    hf_api_token: Option<String>,
    pub hf_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub pollinations_base_url: String,
    pub segmentation_url: Option<String>,
    pub media_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_origins", &self.cors_origins)
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("groq_base_url", &self.groq_base_url)
            .field("hf_api_token", &self.hf_api_token.as_ref().map(|_| "[REDACTED]"))
            .field("hf_base_url", &self.hf_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("pollinations_base_url", &self.pollinations_base_url)
            .field("segmentation_url", &self.segmentation_url)
            .field("media_dir", &self.media_dir)
            .finish()
    }
}

impl Default for Config {
    /// Development defaults. The JWT secret is the insecure development one.
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            groq_api_key: None,
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            hf_api_token: None,
            hf_base_url: DEFAULT_HF_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            pollinations_base_url: DEFAULT_POLLINATIONS_BASE_URL.to_string(),
            segmentation_url: None,
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set in release builds or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let defaults = Self::default();

        let groq_api_key = non_empty_var("GROQ_API_KEY");
        if groq_api_key.is_none() {
            tracing::warn!("GROQ_API_KEY not set, text neutralization will fail upstream");
        }

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            jwt_secret,
            jwt_expiration_minutes: parsed_var("JWT_EXPIRATION_MINUTES")
                .unwrap_or(defaults.jwt_expiration_minutes),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cors_origins: non_empty_var("CORS_ORIGINS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.cors_origins),
            groq_api_key,
            groq_base_url: env::var("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            hf_api_token: non_empty_var("HF_API_TOKEN"),
            hf_base_url: env::var("HF_BASE_URL").unwrap_or(defaults.hf_base_url),
            text_model: env::var("TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: env::var("IMAGE_MODEL").unwrap_or(defaults.image_model),
            pollinations_base_url: env::var("POLLINATIONS_BASE_URL")
                .unwrap_or(defaults.pollinations_base_url),
            segmentation_url: non_empty_var("SEGMENTATION_URL"),
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_dir),
        }
    }

    /// Replace the JWT signing secret.
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Replace the Groq API key.
    pub fn with_groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Replace the HuggingFace inference token.
    pub fn with_hf_api_token(mut self, token: impl Into<String>) -> Self {
        self.hf_api_token = Some(token.into());
        self
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Groq API key, empty when unset so requests fail with 401 upstream.
    pub fn groq_api_key(&self) -> &str {
        self.groq_api_key.as_deref().unwrap_or_default()
    }

    pub fn hf_api_token(&self) -> Option<&str> {
        self.hf_api_token.as_deref()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
