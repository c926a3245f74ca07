//! Fields command - list the fields records contain.

use clap::Args;
use console::style;

use super::config::load_config;

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Print the extraction rules as JSON instead of the field names
    #[arg(long)]
    rules: bool,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.rules {
        println!("{}", serde_json::to_string_pretty(&config.extraction.rule_defs())?);
        return Ok(());
    }

    let parser = config.build_parser()?;
    for name in parser.field_names() {
        match config.naming.fields.iter().position(|f| *f == name) {
            Some(i) => println!("{} {}", name, style(format!("(filename part {})", i + 1)).dim()),
            None => println!("{}", name),
        }
    }

    Ok(())
}
