//! Platform inspection commands.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum PlatformCommands {
    /// Show the composed aspects and their contributions
    Manifest,

    /// List the content types the search index accepts
    SearchTypes,
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct RouteRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Aspect")]
    aspect: String,
    #[tabled(rename = "Auth")]
    requires_auth: bool,
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct SearchTypeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Aspect")]
    aspect: String,
}

pub async fn execute(cmd: PlatformCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        PlatformCommands::Manifest => {
            let manifest: Value = client.get("/api/v1/platform/manifest").await?;
            match format {
                OutputFormat::Table => {
                    output::print_header("Aspects");
                    for aspect in manifest["aspects"].as_array().into_iter().flatten() {
                        let deps: Vec<&str> = aspect["dependencies"]
                            .as_array()
                            .into_iter()
                            .flatten()
                            .filter_map(Value::as_str)
                            .collect();
                        let id = aspect["id"].as_str().unwrap_or("?");
                        if deps.is_empty() {
                            output::print_detail(id, "-");
                        } else {
                            output::print_detail(id, &deps.join(", "));
                        }
                    }

                    output::print_header("Routes");
                    let routes: Vec<RouteRow> =
                        serde_json::from_value(manifest["routes"].clone()).unwrap_or_default();
                    output::print_list(&routes, format)?;
                }
                _ => output::print_item(&manifest, format)?,
            }
        }

        PlatformCommands::SearchTypes => {
            let types: Vec<SearchTypeRow> = client.get("/api/v1/platform/search-types").await?;
            output::print_list(&types, format)?;
        }
    }

    Ok(())
}
