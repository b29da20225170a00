//! # Kiosco Server Library
//!
//! Everything the binary and the integration tests share: configuration,
//! shared state, error mapping and the route table.
//!
//! ## Module Organization
//! ```text
//! kiosco_server/
//! ├── lib.rs          ◄─── You are here (AppState + exports)
//! ├── config.rs       ◄─── Environment-driven ServerConfig
//! ├── error.rs        ◄─── ApiError: status codes + {"error": ...} bodies
//! ├── auth.rs         ◄─── Optional bearer token for write endpoints
//! └── routes/
//!     ├── mod.rs      ◄─── Route table (configure) + health
//!     ├── products.rs ◄─── Barcode lookup, search
//!     ├── sales.rs    ◄─── Sale registration
//!     ├── tickets.rs  ◄─── Kitchen ticket queue
//!     └── pages.rs    ◄─── The three HTML views
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use kiosco_db::Database;

use crate::config::ServerConfig;

/// Shared application state, one per server.
///
/// Cloning is cheap: `Database` wraps a reference-counted pool and the
/// config is small.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}
