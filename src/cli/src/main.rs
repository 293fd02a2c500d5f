//! Launchpad CLI - command-line client for the Launchpad platform API.
//!
//! Browses products, launches and forums, runs searches and inspects the
//! composed platform.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config, forums, health, launches, platform, products, search};
use output::OutputFormat;

/// Launchpad - product discovery platform CLI
#[derive(Parser)]
#[command(
    name = "launchpad",
    version,
    about = "Launchpad - product discovery platform",
    long_about = "CLI tool for browsing and managing products, launches and forums on a Launchpad server.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// API server URL
    #[arg(long, global = true, env = "LAUNCHPAD_API_URL")]
    api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = "LAUNCHPAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Product and category operations
    #[command(subcommand)]
    Products(products::ProductCommands),

    /// Launch operations
    #[command(subcommand)]
    Launches(launches::LaunchCommands),

    /// Forum operations
    #[command(subcommand)]
    Forums(forums::ForumCommands),

    /// Search across all content types
    Search(search::SearchArgs),

    /// Inspect the composed platform
    #[command(subcommand)]
    Platform(platform::PlatformCommands),

    /// Check server health
    Health,

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| config::load_value("api-url"))
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let token = cli.token.clone().or_else(|| config::load_value("token"));

    let client = client::ApiClient::new(&api_url, token)?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Products(cmd) => products::execute(cmd, &client, format).await,
        Commands::Launches(cmd) => launches::execute(cmd, &client, format).await,
        Commands::Forums(cmd) => forums::execute(cmd, &client, format).await,
        Commands::Search(args) => search::execute(args, &client, format).await,
        Commands::Platform(cmd) => platform::execute(cmd, &client, format).await,
        Commands::Health => health::execute(&client, format).await,
        Commands::Config(cmd) => config::execute(cmd, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
