use clap::Args;
use serde_json::Value;

use crate::cli::input::{attribute_set, load_collection};
use crate::cli::utils::output_page;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::error::QueryError;
use crate::filter::{build_filter_query, Filter, FilterData};

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[arg(help = "JSON or YAML file holding the fetched list, or - for stdin")]
    pub file: String,
    #[arg(long, help = "Search query, e.g. 'alias co test'")]
    pub filter: Option<String>,
    #[arg(long, value_delimiter = ',', help = "Tag values OR-ed onto the search query")]
    pub tag: Vec<String>,
    #[arg(long, default_value = "tag", help = "Attribute the --tag values match against")]
    pub tag_attribute: String,
    #[arg(long, help = "Sort order, e.g. 'alias desc' or 'issuer, alias desc'")]
    pub order: Option<String>,
    #[arg(long, help = "One-based page number")]
    pub page: Option<usize>,
    #[arg(long, help = "Page size")]
    pub limit: Option<usize>,
    #[arg(long, help = "Zero-based offset (ignored with --page)")]
    pub offset: Option<usize>,
    #[arg(long, value_delimiter = ',', help = "Searchable attributes (default: any)")]
    pub searchable: Vec<String>,
    #[arg(long = "filter-json", help = "Whole query as JSON: {where, order, limit, offset, page}")]
    pub filter_json: Option<String>,
}

pub fn handle(args: QueryArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let records = load_collection(&args.file)?;
    let mut filter = Filter::new(attribute_set(&args.searchable), config.filter.clone());

    if let Some(body) = &args.filter_json {
        let data: FilterData = serde_json::from_str(body)?;
        filter.assign(data).map_err(QueryError::from)?;
    } else {
        let search = args.filter.as_deref().unwrap_or_default();
        if let Some(query) = build_filter_query(search, &args.tag_attribute, &args.tag) {
            filter.where_clause(&query).map_err(QueryError::from)?;
        }
        if let Some(order) = &args.order {
            filter.order(&Value::String(order.clone())).map_err(QueryError::from)?;
        }
        match (args.page, args.limit) {
            (Some(page), limit) => {
                filter.page(page, limit.unwrap_or(config.query.default_page_size));
            }
            (None, Some(limit)) => {
                filter.limit(limit, args.offset);
            }
            (None, None) => {
                if let Some(offset) = args.offset {
                    filter.offset(offset);
                }
            }
        }
    }

    let page = filter.apply(&records);
    output_page(&output_format, &page)
}
