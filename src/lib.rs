//! Sawtna API - content moderation and generation backend
//!
//! Users register and log in with JWTs, store generated content, and run
//! it through the moderation tooling:
//!
//! - neutral rewriting of sensitive text through an LLM, followed by
//!   deterministic masking of flagged vocabulary
//! - text and image appropriateness classification
//! - blurring of red-dominant ("blood") image regions
//! - text-to-image generation
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Pure rules (language detection, masking, prompts, verdicts)
//! - **services**: Application use cases
//! - **infra**: Database, cache, media storage and outbound HTTP clients
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared request types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Mask a sentence offline
//! cargo run -- mask "Reports of genocide"
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
