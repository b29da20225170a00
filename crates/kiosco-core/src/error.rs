//! # Error Types
//!
//! Domain-specific error types for kiosco-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kiosco-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kiosco-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Server errors (apps/server)                                           │
//! │  └── ApiError         - What the wire sees ({"error": ...} + status)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → JSON         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, id, quantities)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to exactly one HTTP status at the boundary

use thiserror::Error;

use crate::ticket::TicketStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are caught at the HTTP
/// boundary and translated into a status code and `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale item references a product id that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the stock observed inside the
    /// registering transaction.
    ///
    /// ## When This Occurs
    /// ```text
    /// register_sale([{P, 3}])      stock(P) = 2
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Leche Entera 1L", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// 400 {"error": "Insufficient stock for Leche Entera 1L: ..."}
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A sale was submitted with no items.
    #[error("Sale has no items")]
    EmptySale,

    /// Kitchen ticket id does not exist.
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// A ticket status move not present in the transition table.
    ///
    /// The reference front-ends only ever send transitions in order, but
    /// the queue no longer trusts them to (a delivered ticket cannot be
    /// marked ready again by a stale kitchen tab).
    #[error("Invalid ticket transition: {from:?} -> {to:?}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., characters a barcode can never contain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
