//! Implementation of the `scaffold presets` command.

use crate::cli::PresetsArgs;
use crate::config::Config;
use crate::error::Result;

/// Execute the `scaffold presets` command.
pub fn cmd_presets(args: &PresetsArgs) -> Result<()> {
    let config = Config::load_from_dir(&args.source)?;

    if config.presets.is_empty() {
        println!("No presets defined in '{}'", args.source.display());
        return Ok(());
    }

    for (name, answers) in &config.presets {
        println!("{}", name);
        for (question, value) in answers {
            println!("  {}: {}", question, display_yaml(value));
        }
    }

    Ok(())
}

/// One-line rendering of a preset answer.
fn display_yaml(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "~".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(display_yaml).collect();
            format!("[{}]", items.join(", "))
        }
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_yaml() {
        let value: serde_yaml::Value = serde_yaml::from_str("[Go, Python]").unwrap();
        assert_eq!(display_yaml(&value), "[Go, Python]");

        let value: serde_yaml::Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(display_yaml(&value), "true");

        let value: serde_yaml::Value = serde_yaml::from_str("gosvc").unwrap();
        assert_eq!(display_yaml(&value), "gosvc");
    }
}
