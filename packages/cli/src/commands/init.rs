use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use jsoncreator_generator::GeneratorOptions;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source roots scanned for superclasses
    #[arg(short, long = "source-root", default_value = "src")]
    pub source_roots: Vec<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing jsoncreator...".bright_blue().bold());

    let config = Config {
        source_roots: args.source_roots.clone(),
        generator: GeneratorOptions::default(),
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    for root in &args.source_roots {
        if !PathBuf::from(cwd).join(root).is_dir() {
            println!("  {} Source root {}/ does not exist yet", "⚠️".yellow(), root);
        }
    }
    println!();
    println!("Next steps:");
    println!("  1. Run: jsoncreator members <File.java>");
    println!("  2. Run: jsoncreator generate <File.java>");

    Ok(())
}
