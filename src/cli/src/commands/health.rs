//! Health check command.

use anyhow::Result;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

pub async fn execute(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: serde_json::Value = client.get_raw("/health").await?;

    match format {
        OutputFormat::Table => {
            let status = health["status"].as_str().unwrap_or("unknown");

            output::print_header("Server Health");
            output::print_detail("Status", status);
            output::print_detail("API URL", client.base_url());
            if let Some(version) = health["version"].as_str() {
                output::print_detail("Version", version);
            }
            if let Some(aspects) = health["aspects"].as_u64() {
                output::print_detail("Aspects", &aspects.to_string());
            }
            if let Some(indexed) = health["indexed"].as_u64() {
                output::print_detail("Indexed records", &indexed.to_string());
            }
            if let Some(ts) = health["timestamp"].as_str() {
                output::print_detail("Timestamp", ts);
            }

            if status == "healthy" {
                output::print_success("Server is up");
            } else {
                output::print_error(&format!("Server status: {}", status));
            }
        }
        _ => output::print_item(&health, format)?,
    }

    Ok(())
}
