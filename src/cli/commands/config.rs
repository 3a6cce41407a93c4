use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    output_value(&output_format, "config", &serde_json::to_value(config)?)
}
