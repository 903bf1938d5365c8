//! `chirpd` — the Chirp server binary.
//!
//! Usage:
//!   chirpd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/chirp/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use chirp_core::{set_dev_mode, Authenticator, AuthorDirectory, Module};
use config::ServerConfig;

/// Chirp server.
#[derive(Parser, Debug)]
#[command(name = "chirpd", about = "Chirp server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    set_dev_mode(server_config.server.dev);
    if server_config.server.dev {
        info!("Development mode: error responses carry internal detail");
    }

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let sql: Arc<dyn chirp_sql::SqlStore> = Arc::new(
        chirp_sql::SqliteStore::open(&data_dir.join("chirp.sqlite"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Initialize modules. The auth service doubles as the request
    // guard and the author directory for the feed.
    let auth_config = auth::service::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        token_ttl_days: server_config.jwt.expires_days,
    };
    let auth_service = auth::service::AuthService::new(Arc::clone(&sql), auth_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize auth: {}", e))?;
    info!("Auth module initialized");

    let guard: Arc<dyn Authenticator> = auth_service.clone();
    let authors: Arc<dyn AuthorDirectory> = auth_service.clone();
    let feed_service = feed::service::FeedService::new(Arc::clone(&sql), authors)
        .map_err(|e| anyhow::anyhow!("failed to initialize feed: {}", e))?;
    info!("Feed module initialized");

    let auth_module = auth::AuthModule::new(auth_service);
    let feed_module = feed::FeedModule::new(feed_service, guard);

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (feed_module.name(), feed_module.routes()),
    ];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Chirp server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
