//! Implementation of the `scaffold check` command.

use super::print_plan;
use crate::answers::{self, AnswerSources};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::generate::Generator;

/// Execute the `scaffold check` command.
///
/// Validates the configuration statically and parses every template path and
/// body. With a preset, resolves its answers non-interactively and plans it.
pub fn cmd_check(args: &CheckArgs) -> Result<()> {
    let config = Config::load_from_dir(&args.source)?;
    println!(
        "Configuration OK: {} question(s), {} computed flag(s), {} feature rule(s), {} hook(s)",
        config.questions.len(),
        config.computed.len(),
        config.features.len(),
        config.hooks.post.len()
    );

    if args.print_config {
        print!("{}", config.to_yaml()?);
    }

    let generator = Generator::new(&config, &args.source)?;
    let count = generator.check_templates()?;
    println!("Templates OK: {} file(s) parsed", count);

    if let Some(name) = &args.preset {
        let sources = AnswerSources {
            preset: Some(config.preset(name)?),
            ..Default::default()
        };
        let answers = answers::resolve(&config, &sources, None)?;
        let plan = generator.plan(&answers)?;

        println!();
        print_plan(&plan, &format!("preset '{}'", name));
    }

    Ok(())
}
