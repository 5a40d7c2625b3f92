//! Command implementations for scaffold.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod check;
mod new;
mod presets;


use crate::cli::{Cli, Command};
use crate::error::Result;
use crate::events::EventLog;
use crate::generate::{Omission, Plan};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let events = EventLog::new(cli.log);

    match cli.command {
        Command::New(args) => new::cmd_new(&args, &events),
        Command::Check(args) => check::cmd_check(&args),
        Command::Presets(args) => presets::cmd_presets(&args),
    }
}

/// Print included and omitted files of a plan.
fn print_plan(plan: &Plan, target: &str) {
    println!("Plan for {}:", target);

    for file in &plan.files {
        if file.output_path == file.template_path {
            println!("  + {}", file.output_path);
        } else {
            println!("  + {}  (from {})", file.output_path, file.template_path);
        }
    }

    for omitted in &plan.omitted {
        match &omitted.omission {
            Omission::Excluded { rules } => {
                let rules: Vec<String> = rules.iter().map(|i| format!("features[{}]", i)).collect();
                println!(
                    "  - {}  (excluded by {})",
                    omitted.template_path,
                    rules.join(", ")
                );
            }
            Omission::EmptyPath => {
                println!("  - {}  (path renders empty)", omitted.template_path);
            }
        }
    }

    println!();
    println!(
        "{} file(s) included, {} omitted",
        plan.files.len(),
        plan.omitted.len()
    );
}
