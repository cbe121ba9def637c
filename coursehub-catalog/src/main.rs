//! coursehub-catalog - course material catalog service
//!
//! Serves material browsing (with freshman classification), overrides,
//! ratings, bookmarks, duplicate checks and metadata suggestions over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use coursehub_catalog::services::AiGatewayClient;
use coursehub_catalog::{build_router, db, AppState};
use coursehub_common::config::{
    default_config_path, prepare_root_folder, resolve_ai_api_key, RootFolderResolver, TomlConfig,
};
use coursehub_common::Taxonomy;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "coursehub-catalog", version, about = "Course material catalog service")]
struct Cli {
    /// Root folder holding the catalog database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Bootstrap TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP port (overrides the config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = TomlConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting CourseHub catalog (coursehub-catalog) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if config_path.exists() {
        info!("Loaded config file {}", config_path.display());
    } else {
        warn!("Config file {} not found, using built-in defaults", config_path.display());
    }

    let root_folder = RootFolderResolver::new(cli.root_folder, &config).resolve();
    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = match db::init_database_pool(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let taxonomy = match &config.taxonomy_file {
        Some(path) => {
            let taxonomy = Taxonomy::load(path)
                .with_context(|| format!("Invalid taxonomy file {}", path.display()))?;
            info!(schools = taxonomy.schools().len(), "Loaded taxonomy from {}", path.display());
            taxonomy
        }
        None => Taxonomy::default(),
    };

    let api_key = resolve_ai_api_key(&config.ai);
    let ai_client = AiGatewayClient::new(&config.ai, api_key)
        .context("Failed to build AI gateway client")?;
    info!(
        endpoint = %config.ai.endpoint,
        model = %config.ai.model,
        has_api_key = ai_client.has_api_key(),
        "AI gateway configured"
    );

    let state = AppState::load(pool, taxonomy, Arc::new(ai_client), config.catalog.page_size).await?;
    let app = build_router(state);

    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("coursehub-catalog listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
