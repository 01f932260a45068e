//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sawtna API - content moderation and generation service
#[derive(Parser, Debug)]
#[command(name = "sawtna-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Mask sensitive terms in text without calling the LLM
    Mask(MaskArgs),

    /// Blur blood regions of a local image
    Blur(BlurArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the mask command
#[derive(Parser, Debug)]
pub struct MaskArgs {
    /// Text to mask
    pub text: String,

    /// Force a language (`ar` or `en`) instead of detecting it
    #[arg(short, long)]
    pub lang: Option<String>,
}

/// Arguments for the blur command
#[derive(Parser, Debug)]
pub struct BlurArgs {
    /// Image to process
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mask_with_language() {
        let cli = Cli::try_parse_from(["sawtna-api", "mask", "some text", "--lang", "ar"]).unwrap();
        match cli.command {
            Commands::Mask(args) => {
                assert_eq!(args.text, "some text");
                assert_eq!(args.lang.as_deref(), Some("ar"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_migrate_status() {
        let cli = Cli::try_parse_from(["sawtna-api", "-v", "migrate", "status"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }
}
