//! patt-api - Piper Alpha Training Tracker HTTP service
//!
//! Records per-session training performance submitted by the simulator,
//! normalizes it against the fixed seven-chapter curriculum, and serves
//! session listings and the downloadable PDF course report.

use anyhow::Result;
use clap::Parser;
use patt_common::auth::load_signing_secret;
use patt_common::config::Settings;
use patt_common::db::init_database;
use tracing::info;

use patt_api::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "patt-api", about = "Piper Alpha training progress service")]
struct Args {
    /// Folder holding the database (overrides PATT_ROOT and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// TCP port to listen on (overrides PATT_PORT and config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting PATT Training Tracker (patt-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let settings = Settings::resolve(args.root_folder.as_deref(), args.port);
    settings.ensure_root_exists()?;

    let db_path = settings.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    info!("✓ Database ready");

    let signing_secret = load_signing_secret(&pool).await?;
    info!("✓ Loaded token signing secret");

    let state = AppState::new(pool, signing_secret);
    let app = build_router(state);

    let bind_addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("patt-api listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
