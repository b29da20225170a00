//! # Kiosco POS Server
//!
//! Single service process for the kiosk: JSON API plus the three HTML
//! views (cashier terminal, kitchen display, order board).
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize logging (tracing-subscriber, RUST_LOG, default "info")
//! 2. Load configuration from environment
//! 3. Open the SQLite database (creates file + runs migrations)
//! 4. Serve HTTP until SIGINT/SIGTERM
//! ```

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kiosco_db::{Database, DbConfig};
use kiosco_server::config::ServerConfig;
use kiosco_server::{routes, AppState};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Kiosco POS server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db = %config.database_path,
        auth = config.api_token.is_some(),
        "Configuration loaded"
    );

    // The SQLite file's directory must exist before the pool opens it
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Connect to database (runs migrations)
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Database ready");

    let state = web::Data::new(AppState {
        db,
        config: config.clone(),
    });

    let bind = (config.bind_addr.as_str(), config.http_port);
    info!(addr = %format!("{}:{}", bind.0, bind.1), "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
