use clap::Parser;
use console_list_query::cli::utils::output_error;
use console_list_query::cli::{Cli, OutputFormat};
use console_list_query::QueryError;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env if present so APP_ENV and FILTER_* overrides apply
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = console_list_query::config::config();
    tracing::debug!("Starting listq in {:?} mode", config.environment);

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = console_list_query::cli::run(cli, config) {
        match e.downcast_ref::<QueryError>() {
            Some(query_error) => output_error(&output_format, query_error)?,
            None => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
