use clap::Args;

use crate::cli::input::attribute_set;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::error::QueryError;
use crate::filter::{AttributeSet, FilterWhere};

#[derive(Args, Debug)]
pub struct ParseArgs {
    #[arg(help = "Search query to parse")]
    pub query: String,
    #[arg(long, value_delimiter = ',', help = "Searchable attributes (default: any)")]
    pub searchable: Vec<String>,
}

pub fn handle(args: ParseArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let attributes: AttributeSet = attribute_set(&args.searchable);
    let expression = FilterWhere::parse(&args.query, &attributes, &config.filter).map_err(QueryError::from)?;
    output_value(&output_format, "expression", &serde_json::to_value(&expression)?)
}
