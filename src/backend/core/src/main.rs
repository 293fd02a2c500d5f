//! Launchpad Server - Main entry point

use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use launchpad_core::{
    api::{self, AppState},
    aspects::{self, launches::LaunchPoller, Services},
    config::Config,
    middleware::{AuthConfig, Authenticator, Claims},
    observability,
    search::SearchService,
    store,
};

#[derive(Parser)]
#[command(name = "launchpad-server", version, about = "Launchpad platform backend")]
struct Cli {
    /// Configuration file; environment variables override it
    #[arg(short, long, env = "LAUNCHPAD_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed bearer token for local testing
    IssueToken {
        /// User id placed in the `sub` claim
        #[arg(long)]
        user: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Role names, repeatable
        #[arg(long = "role", default_value = "member")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        Config::default()
    });

    let authenticator = Arc::new(Authenticator::new(AuthConfig::from_settings(&config.auth))?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::IssueToken { user, name, roles } => {
            let mut claims = Claims::builder(user)
                .roles(roles)
                .expires_in(chrono::Duration::seconds(config.auth.token_expiry_secs as i64));
            if let Some(name) = name {
                claims = claims.name(name);
            }
            println!("{}", authenticator.generate_token(&claims.build())?);
            Ok(())
        }
        Command::Serve => serve(config, authenticator).await,
    }
}

async fn serve(config: Config, authenticator: Arc<Authenticator>) -> anyhow::Result<()> {
    observability::init("launchpad-server", &config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        "Starting Launchpad Server"
    );

    let store = store::connect(&config.database).await?;
    let services = Services::new(store, SearchService::in_memory());

    let platform = Arc::new(aspects::compose(&services)?);
    tracing::info!(aspects = platform.shell().aspects().len(), "Platform composed");

    if config.platform.seed_fixtures {
        let seeded = platform.seed(&services).await?;
        tracing::info!(records = seeded, "Fixtures seeded");
    }

    let poller = Arc::new(LaunchPoller::new(
        services.launches.clone(),
        Duration::from_secs(config.platform.launch_poll_interval_secs),
    ));
    let poller_handle = poller.clone().spawn();

    let state = AppState::new(services, platform).with_graphiql(config.server.graphiql);
    let app = api::build_router(state, authenticator);

    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    poller.shutdown();
    if let Err(e) = poller_handle.await {
        tracing::warn!(error = %e, "Launch poller exited abnormally");
    }
    observability::shutdown();
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
