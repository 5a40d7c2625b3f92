//! Implementation of the `scaffold new` command.
//!
//! Runs the full pipeline:
//! 1. Load and statically validate `scaffold.yaml`
//! 2. Resolve answers (overrides, preset, prompts, defaults)
//! 3. Plan: computed flags, selection, rendering (nothing written yet)
//! 4. Write every planned file, collecting failures
//! 5. Run post hooks in the output directory

use super::print_plan;
use crate::answers::{self, AnswerSources, DialoguerPrompter, Prompter};
use crate::cli::NewArgs;
use crate::config::Config;
use crate::error::Result;
use crate::events::{EventAction, EventLog};
use crate::expr::Scope;
use crate::generate::{self, Generator, WriteOptions, WriteReport};
use crate::hooks;
use serde_json::json;
use std::io::IsTerminal;
use tracing::info;

/// Execute the `scaffold new` command.
pub fn cmd_new(args: &NewArgs, events: &EventLog) -> Result<()> {
    let events = events.clone().for_source(&args.source);

    let result = run_new(args, &events);
    if let Err(e) = &result {
        events.record(
            EventAction::Fail,
            json!({
                "output": args.output.display().to_string(),
                "error": e.to_string(),
                "exit_code": e.exit_code(),
            }),
        );
    }
    result
}

fn run_new(args: &NewArgs, events: &EventLog) -> Result<()> {
    let config = Config::load_from_dir(&args.source)?;
    info!(source = %args.source.display(), "configuration loaded");

    let sources = AnswerSources {
        preset: args
            .preset
            .as_deref()
            .map(|name| config.preset(name))
            .transpose()?,
        overrides: answers::parse_overrides(&args.set)?,
    };

    let interactive = !args.no_prompt && std::io::stdin().is_terminal();
    let mut terminal = DialoguerPrompter::new();
    let prompter: Option<&mut dyn Prompter> = if interactive {
        Some(&mut terminal)
    } else {
        None
    };
    let answers = answers::resolve(&config, &sources, prompter)?;

    let generator = Generator::new(&config, &args.source)?;
    let plan = generator.plan(&answers)?;
    events.record(
        EventAction::Plan,
        json!({
            "preset": args.preset,
            "included": plan.files.len(),
            "omitted": plan.omitted.len(),
            "dry_run": args.dry_run,
        }),
    );

    if args.dry_run {
        print_plan(&plan, &format!("'{}'", args.output.display()));
        return Ok(());
    }

    let options = WriteOptions { force: args.force };
    let report: WriteReport = generate::write(&plan, &args.output, options);
    events.record(
        EventAction::Write,
        json!({
            "output": args.output.display().to_string(),
            "written": report.written.len(),
            "failed": report
                .failures
                .iter()
                .map(|f| f.path.display().to_string())
                .collect::<Vec<_>>(),
        }),
    );
    let written = report.into_result()?;

    println!(
        "Generated {} file(s) in '{}'",
        written.len(),
        args.output.display()
    );

    if !args.no_hooks && !config.hooks.is_empty() {
        let results = hooks::run_hooks(&config.hooks.post, &Scope::new(&plan.scope), &args.output)?;
        for result in &results {
            println!("  [{}] {}", result.status.as_str(), result.name);
            events.record(
                EventAction::Hook,
                json!({
                    "name": result.name,
                    "status": result.status.as_str(),
                    "message": result.message,
                }),
            );
        }
        hooks::check_results(&results)?;
    }

    events.record(
        EventAction::Complete,
        json!({
            "output": args.output.display().to_string(),
            "written": written.len(),
        }),
    );

    Ok(())
}
