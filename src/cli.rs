//! Command-line interface for modelcat
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Resolve required files and labels for a model download catalog
#[derive(Parser, Debug)]
#[command(
    name = "modelcat",
    version,
    about = "Determine which files each cataloged model needs at inference time"
)]
pub struct Cli {
    /// Path to the models catalog (default: ../src/config/models.yaml next to the executable)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Where to write the updated catalog (default: stdout)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory for cached archive downloads (default: .model_cache next to the executable)
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Re-download every archive instead of reusing cached files
    #[arg(long)]
    pub no_cache: bool,

    /// Suppress per-descriptor progress output (errors and warnings still print)
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["modelcat"]);
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert!(cli.cache_dir.is_none());
        assert!(!cli.no_cache);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_parses_positionals_and_flags() {
        let cli = Cli::parse_from([
            "modelcat",
            "models.yaml",
            "out.yaml",
            "--cache-dir",
            "/tmp/cache",
            "--no-cache",
            "--quiet",
        ]);
        assert_eq!(cli.input.unwrap(), PathBuf::from("models.yaml"));
        assert_eq!(cli.output.unwrap(), PathBuf::from("out.yaml"));
        assert_eq!(cli.cache_dir.unwrap(), PathBuf::from("/tmp/cache"));
        assert!(cli.no_cache);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_help_does_not_panic() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
