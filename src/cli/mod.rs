//! CLI module - Command-line interface for the application.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `mask` - Offline sensitive-term masking
//! - `blur` - Offline blood-region blurring

pub mod args;

pub use args::{Cli, Commands};
