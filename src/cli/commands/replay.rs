use clap::Args;

use crate::cli::input::{attribute_set, load_collection, load_document};
use crate::cli::utils::{output_error, output_page};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::query::{QueryCommand, QueryOptions, QueryState};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    #[arg(help = "JSON or YAML file holding the fetched list, or - for stdin")]
    pub file: String,
    #[arg(help = "JSON or YAML file with the list of view commands")]
    pub commands: String,
    #[arg(long, value_delimiter = ',', help = "Searchable attributes (default: any)")]
    pub searchable: Vec<String>,
    #[arg(long, value_delimiter = ',', help = "Sortable attributes (default: any)")]
    pub sortable: Vec<String>,
    #[arg(long, help = "Print the page after every command")]
    pub each: bool,
}

pub fn handle(args: ReplayArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let records = load_collection(&args.file)?;
    let commands: Vec<QueryCommand> = load_document(&args.commands)?;

    let options = QueryOptions::from_config(config, attribute_set(&args.searchable), attribute_set(&args.sortable));
    let mut state = QueryState::new(records, options);

    for command in commands {
        tracing::debug!("Replaying {:?}", command);
        // A rejected command is a notification, the list stays as it was
        if let Err(e) = state.dispatch(command) {
            output_error(&output_format, &e)?;
        }
        if args.each {
            output_page(&output_format, &state.view())?;
        }
    }

    if !args.each {
        output_page(&output_format, &state.view())?;
    }
    Ok(())
}
