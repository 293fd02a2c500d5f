//! Search command backed by the REST search route.

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Search text
    query: String,

    /// Restrict to these content types (product, launch, review, topic, ...)
    #[arg(short, long = "type", value_delimiter = ',')]
    types: Vec<String>,

    /// Maximum number of hits
    #[arg(short, long)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    id: String,
    content_type: String,
    title: String,
    snippet: String,
    url: Option<String>,
    score: f64,
}

#[derive(Tabled, Serialize)]
struct HitRow {
    #[tabled(rename = "Type")]
    content_type: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Snippet")]
    snippet: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Encode the query string for `/api/v1/search`.
fn search_path(args: &SearchArgs) -> String {
    let mut path = format!("/api/v1/search?q={}", encode(&args.query));
    if !args.types.is_empty() {
        path.push_str(&format!("&types={}", encode(&args.types.join(","))));
    }
    if let Some(limit) = args.limit {
        path.push_str(&format!("&limit={}", limit));
    }
    path
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b',' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

pub async fn execute(args: SearchArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let hits: Vec<SearchHit> = client.get(&search_path(&args)).await?;

    match format {
        OutputFormat::Table => {
            let rows: Vec<HitRow> = hits
                .iter()
                .map(|hit| HitRow {
                    content_type: hit.content_type.clone(),
                    title: hit.title.clone(),
                    snippet: output::truncate(&hit.snippet, 50),
                    url: hit.url.clone().unwrap_or_default(),
                    score: format!("{:.2}", hit.score),
                })
                .collect();
            output::print_list(&rows, format)?;
        }
        _ => output::print_item(&hits, format)?,
    }

    Ok(())
}
