//! CLI argument parsing for scaffold.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scaffold: generate a project from a template directory.
///
/// A template source directory holds `scaffold.yaml` and a template tree.
/// Answers to the configured questions decide which files are generated
/// (feature rules) and fill in `{{ ... }}` placeholders in paths and contents.
#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug diagnostics on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append an NDJSON event log of the run to this file.
    #[arg(long, global = true, env = "SCAFFOLD_LOG", value_name = "FILE")]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for scaffold.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a project into an output directory.
    ///
    /// Resolves answers, derives computed flags, selects and renders every
    /// template file, writes the result, then runs post hooks.
    New(NewArgs),

    /// Validate a template source without generating anything.
    ///
    /// Checks the configuration statically and parses every template. With
    /// `--preset`, also plans the preset end to end.
    Check(CheckArgs),

    /// List the presets defined by a template source.
    Presets(PresetsArgs),
}

/// Arguments for the `new` command.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Template source directory (contains scaffold.yaml).
    pub source: PathBuf,

    /// Output directory (created if missing).
    pub output: PathBuf,

    /// Use a named preset for answers.
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Never prompt; unanswered questions use their defaults.
    #[arg(long)]
    pub no_prompt: bool,

    /// Answer a question directly (repeatable). Multi answers are comma separated.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Overwrite files that already exist in the output directory.
    #[arg(short, long)]
    pub force: bool,

    /// Print the plan without writing files or running hooks.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not run post hooks.
    #[arg(long)]
    pub no_hooks: bool,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Template source directory (contains scaffold.yaml).
    pub source: PathBuf,

    /// Also plan this preset end to end.
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Print the parsed configuration with defaults filled in.
    #[arg(long)]
    pub print_config: bool,
}

/// Arguments for the `presets` command.
#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Template source directory (contains scaffold.yaml).
    pub source: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_minimal() {
        let cli = Cli::try_parse_from(["scaffold", "new", "tmpl", "out"]).unwrap();
        assert!(!cli.verbose);
        if let Command::New(args) = cli.command {
            assert_eq!(args.source, PathBuf::from("tmpl"));
            assert_eq!(args.output, PathBuf::from("out"));
            assert!(args.preset.is_none());
            assert!(!args.no_prompt);
            assert!(args.set.is_empty());
            assert!(!args.force);
            assert!(!args.dry_run);
            assert!(!args.no_hooks);
        } else {
            panic!("Expected New command");
        }
    }

    #[test]
    fn parse_new_full() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "-v",
            "new",
            "tmpl",
            "out",
            "--preset",
            "go-only",
            "--no-prompt",
            "--set",
            "ProjectName=demo",
            "--set",
            "langs=Go,Python",
            "--force",
            "--dry-run",
            "--no-hooks",
            "--log",
            "events.ndjson",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log, Some(PathBuf::from("events.ndjson")));
        if let Command::New(args) = cli.command {
            assert_eq!(args.preset.as_deref(), Some("go-only"));
            assert!(args.no_prompt);
            assert_eq!(args.set, vec!["ProjectName=demo", "langs=Go,Python"]);
            assert!(args.force);
            assert!(args.dry_run);
            assert!(args.no_hooks);
        } else {
            panic!("Expected New command");
        }
    }

    #[test]
    fn parse_new_requires_output() {
        assert!(Cli::try_parse_from(["scaffold", "new", "tmpl"]).is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "check",
            "tmpl",
            "-p",
            "python",
            "--print-config",
        ])
        .unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.source, PathBuf::from("tmpl"));
            assert_eq!(args.preset.as_deref(), Some("python"));
            assert!(args.print_config);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn parse_presets() {
        let cli = Cli::try_parse_from(["scaffold", "presets", "tmpl"]).unwrap();
        assert!(matches!(cli.command, Command::Presets(_)));
    }
}
