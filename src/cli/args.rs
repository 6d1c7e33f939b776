//! CLI argument definitions
//!
//! All Clap derive structs for `vitrine` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Staged storefront presentation controller.
#[derive(Parser, Debug)]
#[command(name = "vitrine", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "VITRINE_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a presentation sequence to its terminal display state.
    Run(RunArgs),

    /// Validate configuration files without running a sequence.
    Validate(ValidateArgs),

    /// Display version information.
    Version,
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to YAML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "VITRINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to a YAML store snapshot (cart and user state) for the
    /// rendered header.
    #[arg(long, env = "VITRINE_STORE")]
    pub store: Option<PathBuf>,

    /// Write the JSONL event stream to this file instead of
    /// discarding it.
    #[arg(long, env = "VITRINE_EVENTS")]
    pub events: Option<PathBuf>,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long, env = "VITRINE_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Output format for projection updates.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Validate Command
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Shared Value Enums
// ============================================================================

/// Color output control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the terminal and `NO_COLOR`.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_with_config() {
        let cli = Cli::parse_from(["vitrine", "run", "--config", "vitrine.yaml"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.config.unwrap().to_str(), Some("vitrine.yaml"));
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["vitrine", "validate"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["vitrine", "-vvv", "version"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_json_format() {
        let cli = Cli::parse_from(["vitrine", "validate", "--format", "json", "a.yaml"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate command");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.strict);
    }
}
