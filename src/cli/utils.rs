use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::QueryError;
use crate::filter::ListPage;

/// Output one page of records with its pagination counters
pub fn output_page<T: Serialize>(output_format: &OutputFormat, page: &ListPage<T>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        OutputFormat::Text => {
            if page.items.is_empty() {
                println!("No records on this page");
            }
            for item in &page.items {
                println!("{}", serde_json::to_string(item)?);
            }
            println!(
                "Page {} of {} ({} records, showing {} from offset {})",
                page.page, page.total_pages, page.total_list_size, page.items.len(), page.offset
            );
        }
    }
    Ok(())
}

/// Output a query error in the appropriate format
pub fn output_error(output_format: &OutputFormat, error: &QueryError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error.to_json())?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {} ({})", error.message(), error);
        }
    }
    Ok(())
}

/// Output a labelled structured value
pub fn output_value(output_format: &OutputFormat, label: &str, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ label: value }))?);
        }
        OutputFormat::Text => {
            println!("{}:", label);
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
