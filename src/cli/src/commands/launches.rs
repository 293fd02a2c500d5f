//! Launch commands.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

const LAUNCH_FIELDS: &str = "id productId title description launchDate status authorId";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LaunchStatusArg {
    Upcoming,
    Live,
}

#[derive(Subcommand)]
pub enum LaunchCommands {
    /// List launches, latest launch date first
    List {
        /// Only launches in this status
        #[arg(short, long)]
        status: Option<LaunchStatusArg>,
        /// Only launches of this product
        #[arg(short, long)]
        product: Option<String>,
        #[arg(short, long, default_value = "20")]
        limit: i32,
    },

    /// Schedule a launch for a product you own
    Create {
        /// Product ID
        #[arg(short, long)]
        product: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
        /// RFC 3339 launch date, e.g. 2026-11-01T09:00:00Z
        #[arg(long)]
        date: String,
    },

    /// Put a launch live ahead of its date
    GoLive {
        /// Launch ID
        id: String,
    },
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct Launch {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product_id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(skip)]
    description: String,
    #[tabled(rename = "Launch date")]
    launch_date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(skip)]
    author_id: String,
}

pub async fn execute(cmd: LaunchCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        LaunchCommands::List { status, product, limit } => {
            let query = format!(
                "query($filter: LaunchFilter, $limit: Int) {{ \
                 listLaunches(filter: $filter, limit: $limit) {{ {} }} }}",
                LAUNCH_FIELDS
            );
            let status = status.map(|s| match s {
                LaunchStatusArg::Upcoming => "UPCOMING",
                LaunchStatusArg::Live => "LIVE",
            });
            let filter = json!({ "status": status, "productId": product });
            let launches: Vec<Launch> = client
                .graphql(&query, json!({ "filter": filter, "limit": limit }), "listLaunches")
                .await?;
            output::print_list(&launches, format)?;
        }

        LaunchCommands::Create {
            product,
            title,
            description,
            date,
        } => {
            let query = format!(
                "mutation($input: CreateLaunchInput!) {{ createLaunch(input: $input) {{ {} }} }}",
                LAUNCH_FIELDS
            );
            let input = json!({
                "productId": product,
                "title": title,
                "description": description,
                "launchDate": date,
            });
            let launch: Launch = client.graphql(&query, json!({ "input": input }), "createLaunch").await?;
            output::print_success(&format!("Scheduled {} for {}", launch.title, launch.launch_date));
            if !matches!(format, OutputFormat::Table) {
                output::print_item(&launch, format)?;
            }
        }

        LaunchCommands::GoLive { id } => {
            let query = format!("mutation($id: ID!) {{ goLive(id: $id) {{ {} }} }}", LAUNCH_FIELDS);
            let launch: Launch = client.graphql(&query, json!({ "id": id }), "goLive").await?;
            output::print_success(&format!("{} is live", launch.title));
        }
    }

    Ok(())
}
