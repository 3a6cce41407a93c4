pub mod commands;
pub mod input;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "listq")]
#[command(about = "listq - filter, sort and paginate record lists fetched from the identity server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a one-shot list query over a JSON or YAML collection")]
    Query(commands::query::QueryArgs),

    #[command(about = "Replay a sequence of view interactions against a collection")]
    Replay(commands::replay::ReplayArgs),

    #[command(about = "Parse a search query and print its structure")]
    Parse(commands::parse::ParseArgs),

    #[command(about = "Show the effective configuration")]
    Config,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Query(args) => commands::query::handle(args, config, output_format),
        Commands::Replay(args) => commands::replay::handle(args, config, output_format),
        Commands::Parse(args) => commands::parse::handle(args, config, output_format),
        Commands::Config => commands::config::handle(config, output_format),
    }
}
