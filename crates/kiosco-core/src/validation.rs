//! # Validation Module
//!
//! Input validation for requests arriving at the kiosk API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end (JS)                                               │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request handler (Rust)                                       │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / UNIQUE / CHECK / FK constraints                        │
//! │                                                                         │
//! │  Defense in depth: each layer catches different mistakes               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_BARCODE, MAX_LINE_QUANTITY, MAX_PRODUCT_NAME, MAX_TICKET_DESCRIPTION};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a kitchen ticket description.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 255 characters
///
/// ## Example
/// ```rust
/// use kiosco_core::validation::validate_description;
///
/// assert!(validate_description("Sandwich milanesa completo").is_ok());
/// assert!(validate_description("   ").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "descripcion".to_string(),
        });
    }

    if description.chars().count() > MAX_TICKET_DESCRIPTION {
        return Err(ValidationError::TooLong {
            field: "descripcion".to_string(),
            max: MAX_TICKET_DESCRIPTION,
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: MAX_PRODUCT_NAME,
        });
    }

    Ok(())
}

/// Validates a barcode as scanned or typed at the terminal.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
/// - No control characters (a misread scan tends to inject them)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "codigo_barras".to_string(),
        });
    }

    if barcode.chars().count() > MAX_BARCODE {
        return Err(ValidationError::TooLong {
            field: "codigo_barras".to_string(),
            max: MAX_BARCODE,
        });
    }

    if barcode.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "codigo_barras".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be positive
/// - Must be at most [`MAX_LINE_QUANTITY`]
///
/// ## Example
/// ```rust
/// use kiosco_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "cantidad".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
