//! Post-generation hook pipeline.
//!
//! Hooks run in the output directory after every file was written, in
//! declaration order. Commands are split with shell-words and executed
//! directly, never through a shell. A hook whose `when` condition is false
//! is skipped. Every hook runs even if an earlier one failed.

use crate::config::HookStep;
use crate::error::{Result, ScaffoldError};
use crate::expr::{self, Scope};
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Maximum number of output lines kept in a failure message.
pub const HOOK_OUTPUT_MAX_LINES: usize = 50;

/// Maximum characters of output kept in a failure message.
pub const HOOK_OUTPUT_MAX_CHARS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Pass,
    Fail,
    Skip,
}

impl HookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HookStatus::Pass => "pass",
            HookStatus::Fail => "fail",
            HookStatus::Skip => "skip",
        }
    }
}

/// Result of a single hook.
#[derive(Debug, Clone)]
pub struct HookResult {
    pub name: String,
    pub status: HookStatus,
    pub message: Option<String>,
}

impl HookResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HookStatus::Pass,
            message: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HookStatus::Fail,
            message: Some(message.into()),
        }
    }

    pub fn skip(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HookStatus::Skip,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, HookStatus::Pass | HookStatus::Skip)
    }
}

/// Evaluate a hook's `when` condition. Hooks without one always run.
pub fn should_run(step: &HookStep, scope: &Scope<'_>) -> Result<bool> {
    let Some(when) = &step.when else {
        return Ok(true);
    };

    let label = format!("hooks.post.{}", step.name);
    let cond = expr::parse(when).map_err(|e| {
        ScaffoldError::config(&label, format!("invalid expression '{}': {}", when, e))
    })?;
    expr::eval_bool(&cond, scope).map_err(|e| ScaffoldError::expression(label, e))
}

/// Run hooks in `out_dir`.
///
/// Conditions are evaluated for every hook before any command runs, so an
/// expression error aborts the pipeline without side effects.
pub fn run_hooks(steps: &[HookStep], scope: &Scope<'_>, out_dir: &Path) -> Result<Vec<HookResult>> {
    let decisions = steps
        .iter()
        .map(|step| should_run(step, scope))
        .collect::<Result<Vec<_>>>()?;

    let mut results = Vec::with_capacity(steps.len());
    for (step, run) in steps.iter().zip(decisions) {
        if !run {
            info!(hook = %step.name, "skipping hook (condition is false)");
            results.push(HookResult::skip(&step.name, "skipped (condition is false)"));
            continue;
        }

        info!(hook = %step.name, command = %step.command, "running hook");
        let result = run_hook(&step.name, &step.command, out_dir);
        if !result.is_success() {
            warn!(hook = %step.name, "hook failed");
        }
        results.push(result);
    }

    Ok(results)
}

/// Collect failed hooks into a [`ScaffoldError::HookFailed`], if any.
pub fn check_results(results: &[HookResult]) -> Result<()> {
    let failures: Vec<String> = results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| match &r.message {
            Some(msg) => format!("  x {}: {}", r.name, msg),
            None => format!("  x {}", r.name),
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ScaffoldError::HookFailed(failures))
    }
}

fn run_hook(name: &str, command: &str, dir: &Path) -> HookResult {
    let command = command.trim();
    let args = match shell_words::split(command) {
        Ok(args) => args,
        Err(e) => {
            return HookResult::fail(
                name,
                format!("failed to parse command: {}\nCommand: {}", e, command),
            );
        }
    };

    let Some((program, cmd_args)) = args.split_first() else {
        return HookResult::fail(name, "command is empty");
    };

    let output = match Command::new(program)
        .args(cmd_args)
        .current_dir(dir)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            return HookResult::fail(
                name,
                format!(
                    "failed to execute command: {}\nCommand: {}\nFix: ensure the command is installed and in PATH.",
                    e, command
                ),
            );
        }
    };

    if output.status.success() {
        return HookResult::pass(name);
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    let combined = if stderr.is_empty() {
        stdout
    } else {
        format!("{}\n{}", stdout, stderr)
    };

    let mut msg = format!(
        "command failed with exit code {}\nCommand: {}",
        exit_code, command
    );
    let truncated = truncate_output(&combined, HOOK_OUTPUT_MAX_LINES, HOOK_OUTPUT_MAX_CHARS);
    if !truncated.trim().is_empty() {
        msg.push_str("\nOutput (truncated):\n");
        msg.push_str(&truncated);
    }

    HookResult::fail(name, msg)
}

/// Keep the last `max_lines` lines and at most `max_chars` characters.
fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    let result = lines[start..].join("\n");

    let char_count = result.chars().count();
    if char_count <= max_chars {
        return result;
    }

    let tail: String = result.chars().skip(char_count - max_chars).collect();
    format!("...(truncated)...\n{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Env, Value};
    use tempfile::TempDir;

    fn step(name: &str, command: &str, when: Option<&str>) -> HookStep {
        HookStep {
            name: name.to_string(),
            command: command.to_string(),
            when: when.map(String::from),
        }
    }

    fn go_env(go: bool) -> Env {
        let mut env = Env::new();
        env.insert("go".to_string(), Value::Bool(go));
        env
    }

    #[test]
    fn test_should_run_unconditional() {
        let env = Env::new();
        assert!(should_run(&step("fmt", "gofmt -w .", None), &Scope::new(&env)).unwrap());
    }

    #[test]
    fn test_should_run_condition() {
        let hook = step("fmt", "gofmt -w .", Some("go"));

        let on = go_env(true);
        assert!(should_run(&hook, &Scope::new(&on)).unwrap());

        let off = go_env(false);
        assert!(!should_run(&hook, &Scope::new(&off)).unwrap());
    }

    #[test]
    fn test_should_run_undefined_name_is_error() {
        let env = Env::new();
        let err = should_run(&step("fmt", "gofmt", Some("go")), &Scope::new(&env)).unwrap_err();
        assert!(matches!(err, ScaffoldError::Expression { ref context, .. } if context == "hooks.post.fmt"));
    }

    #[test]
    fn test_skipped_hook_never_runs() {
        let temp = TempDir::new().unwrap();
        let env = go_env(false);
        let hooks = vec![step("fmt", "definitely-not-a-real-binary", Some("go"))];

        let results = run_hooks(&hooks, &Scope::new(&env), temp.path()).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, HookStatus::Skip);
        assert!(check_results(&results).is_ok());
    }

    #[test]
    fn test_missing_program_fails() {
        let temp = TempDir::new().unwrap();
        let result = run_hook("repin", "definitely-not-a-real-binary --flag", temp.path());

        assert_eq!(result.status, HookStatus::Fail);
        assert!(result.message.unwrap().contains("failed to execute command"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hooks_run_in_output_dir_and_failures_collected() {
        let temp = TempDir::new().unwrap();
        let env = go_env(true);
        let hooks = vec![
            step("touch", "sh -c 'echo done > marker.txt'", None),
            step("broken", "sh -c 'echo bad output; exit 3'", None),
            step("after", "sh -c 'echo ran > after.txt'", Some("go")),
        ];

        let results = run_hooks(&hooks, &Scope::new(&env), temp.path()).unwrap();

        assert_eq!(results[0].status, HookStatus::Pass);
        assert_eq!(results[1].status, HookStatus::Fail);
        assert_eq!(results[2].status, HookStatus::Pass);
        assert!(temp.path().join("marker.txt").exists());
        assert!(temp.path().join("after.txt").exists());

        let message = results[1].message.as_deref().unwrap();
        assert!(message.contains("exit code 3"));
        assert!(message.contains("bad output"));

        let err = check_results(&results).unwrap_err();
        match err {
            ScaffoldError::HookFailed(failures) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("broken"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_output_keeps_tail() {
        let output = (1..=10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");

        assert_eq!(truncate_output(&output, 2, 1000), "line 9\nline 10");

        let truncated = truncate_output(&output, 100, 7);
        assert_eq!(truncated, "...(truncated)...\nline 10");
    }
}
