use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use goalpost::config::{ConfigLoader, GoalpostConfig};
use goalpost::init;
use goalpost_server::{AppState, build_app, cli::CliArgs, config::ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let filter = match cli_args.log_level {
        Some(ref level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
    .add_directive("surrealdb_core=warn".parse()?)
    .add_directive("surrealdb=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Goalpost server v{}", goalpost::VERSION);

    let server_config = ServerConfig::from_cli_and_env(cli_args)?;
    info!("Server configuration loaded");

    let core_config = load_core_config(&server_config)?;
    let backend = init(core_config).await?;
    info!("Goalpost backend initialized");

    let app_state = Arc::new(AppState::new(backend, server_config.clone()));
    let app = build_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);
    if server_config.allow_signup {
        info!("User signup is enabled");
    } else {
        info!("User signup is disabled");
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Core configuration: the configured file when given, otherwise the default
/// file locations. Environment variables override either.
fn load_core_config(server_config: &ServerConfig) -> Result<GoalpostConfig> {
    let mut loader = ConfigLoader::new();

    match &server_config.config_file_path {
        Some(path) => {
            info!("Loading Goalpost configuration from: {}", path.display());
            if let Err(e) = loader.load_file(path) {
                warn!(
                    "Failed to load config file {}: {}. Using defaults.",
                    path.display(),
                    e
                );
            }
        }
        None => {
            loader.load_default_files();
        }
    }

    Ok(loader.load_env().extract()?)
}
