//! # todohubd, the todohub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, `.env`, env vars, CLI flags)
//! - Pick the store from the endpoint scheme and bootstrap its table
//! - Construct the todo service, injecting the repository via the port trait
//! - Build the axum router, injecting the service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

mod config;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todohub_adapter_http_axum::router;
use todohub_adapter_http_axum::state::AppState;
use todohub_app::ports::TodoRepository;
use todohub_app::services::todo_service::TodoService;
use todohub_domain::time::SystemClock;

use crate::config::{Cli, Config, Settings, StoreSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Config::load(&cli).context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    match &settings.store {
        StoreSettings::Sqlite { url } => {
            let db = todohub_adapter_storage_sqlite_sqlx::Config::new(
                url.clone(),
                settings.table_name.clone(),
            )
            .build()
            .await
            .with_context(|| format!("failed to open SQLite store at {url}"))?;
            tracing::info!(%url, table = %settings.table_name, "using SQLite store");
            serve(&settings, db.todo_repository()).await
        }
        StoreSettings::DynamoDb { endpoint, region } => {
            let db = todohub_adapter_storage_dynamodb::Config::new(
                region.clone(),
                settings.table_name.clone(),
            )
            .with_endpoint(endpoint.clone())
            .build()
            .await
            .with_context(|| format!("failed to prepare DynamoDB table at {endpoint}"))?;
            tracing::info!(%endpoint, %region, table = %settings.table_name, "using DynamoDB store");
            serve(&settings, db.todo_repository()).await
        }
    }
}

async fn serve<R>(settings: &Settings, repo: R) -> anyhow::Result<()>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let service = TodoService::new(repo, SystemClock).with_timeout(settings.storage_timeout);
    let app = router::build(AppState::new(service)).context("failed to compile routes")?;

    let bind_addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("todohubd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("todohubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
