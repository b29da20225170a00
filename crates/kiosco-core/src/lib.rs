//! # kiosco-core: Pure Business Logic for Kiosco POS
//!
//! The heart of the kiosk. Every rule that must hold — money arithmetic,
//! stock availability, the kitchen ticket lifecycle — lives here as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kiosco POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Front-ends (terminal / kitchen / order board)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON (polling)                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (actix-web)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosco-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ticket   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  status   │  │   rules   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │  machine  │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kiosco-db (SQLite storage layer)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLine, KitchenTicket)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ticket`] - Kitchen ticket status machine with an explicit transition table
//! - [`error`] - Domain error types
//! - [`validation`] - Input and business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use ticket::TicketStatus;
pub use types::{KitchenTicket, Product, Sale, SaleLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product in one sale.
///
/// ## Business Reason
/// Prevents accidental over-ordering at the terminal (typing 1000 instead
/// of 10) and keeps line subtotals far away from i64 overflow.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum length of a kitchen ticket description.
///
/// Matches the column width the order board renders without truncation.
pub const MAX_TICKET_DESCRIPTION: usize = 255;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME: usize = 200;

/// Maximum length of a barcode.
///
/// EAN-13/UPC-A are much shorter; the headroom covers internal codes
/// printed by the kiosk's own label printer.
pub const MAX_BARCODE: usize = 100;
