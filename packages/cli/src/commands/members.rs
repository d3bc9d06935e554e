use super::{build_index, open_document, target_class};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use jsoncreator_editor::JsonCreatorAction;
use jsoncreator_generator::MemberDescriptor;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MembersArgs {
    /// Java or Groovy source file
    pub file: PathBuf,

    /// Class to inspect (defaults to the class named after the file)
    #[arg(short, long)]
    pub class: Option<String>,

    /// Print the candidates as JSON
    #[arg(long)]
    pub json: bool,
}

/// List the members a JSON creator can be generated from
pub fn members(args: MembersArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let file = PathBuf::from(cwd).join(&args.file);
    let document = open_document(&file)?;
    let class = target_class(&document, args.class)?;
    let index = build_index(&config, cwd, &file);

    let action = JsonCreatorAction::new(config.generator);
    let candidates = action.candidates(&document, &index, &class)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    println!(
        "{} {} ({} candidates)",
        "🔍".bright_blue(),
        class.bright_white().bold(),
        candidates.len()
    );
    for (i, member) in candidates.iter().enumerate() {
        let kind = match member {
            MemberDescriptor::Field(_) => "field".cyan(),
            MemberDescriptor::BaseConstructor(_) => "constructor".magenta(),
        };
        println!("  [{}] {:<11} {}", i, kind, member.label());
    }

    Ok(())
}
