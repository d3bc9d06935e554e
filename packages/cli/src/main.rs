mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{generate, init, members, GenerateArgs, InitArgs, MembersArgs};

/// jsoncreator - generate Jackson @JsonCreator constructors for Java and Groovy classes
#[derive(Parser, Debug)]
#[command(name = "jsoncreator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a jsoncreator.config.json
    Init(InitArgs),

    /// List the fields and superclass constructors a creator can use
    Members(MembersArgs),

    /// Insert @JsonCreator constructors into a source file
    Generate(GenerateArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Members(args) => members(args, &cwd),
        Command::Generate(args) => generate(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
