//! # kiosco-db: Database Layer for Kiosco POS
//!
//! SQLite storage for the kiosk, via sqlx.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (product catalog, sale ledger, ticket queue)
//! - [`checkout`] - The sale transaction coordinator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiosco_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/kiosco.db")).await?;
//!
//! // Lookups go through repositories
//! let product = db.products().get_by_barcode("7790000000001").await?;
//!
//! // Sales go through the coordinator, never through raw repository writes
//! let sale = kiosco_db::checkout::register_sale(&db, &items).await?;
//! ```
//!
//! ## The One Invariant That Matters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product.stock never goes negative, and a sale is either fully          │
//! │  registered (sale + lines + decrements + total) or not at all.          │
//! │                                                                         │
//! │  Enforced by: checkout's single write transaction (pessimistic lock)    │
//! │  Backstops:   guarded decrement (AND stock >= ?), CHECK (stock >= 0)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{register_sale, CheckoutError, SaleItemRequest};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::ticket::TicketRepository;
