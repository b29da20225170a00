//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow at the Boundary                           │
//! │                                                                         │
//! │  ValidationError ─┐                                                     │
//! │  CoreError ───────┼──► ApiError { code, message }                       │
//! │  DbError ─────────┤         │                                           │
//! │  CheckoutError ───┘         ▼                                           │
//! │                    ResponseError impl                                   │
//! │                         │                                               │
//! │                         ▼                                               │
//! │   status code per code  +  body {"error": "<message>"}                  │
//! │                                                                         │
//! │   NotFound           → 404     ValidationError      → 400               │
//! │   InsufficientStock  → 400     InvalidTransition    → 409               │
//! │   Unauthorized       → 401     DatabaseError/Internal → 500             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error is fatal: every classified failure becomes a JSON response and
//! the service keeps running.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use kiosco_core::CoreError;
use kiosco_db::{CheckoutError, DbError};

/// The wire shape of every failure.
#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    error: String,
}

/// API error carried by handlers.
///
/// `code` picks the HTTP status; only `message` reaches the wire.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Error categories, each mapping to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation or business-rule failure (400)
    ValidationError,

    /// Requested quantity exceeds available stock (400)
    InsufficientStock,

    /// Ticket status move not in the transition table (409)
    InvalidTransition,

    /// Missing or wrong bearer token on a write endpoint (401)
    Unauthorized,

    /// Database operation failed (500)
    DatabaseError,

    /// Anything else (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized() -> Self {
        ApiError::new(
            ErrorCode::Unauthorized,
            "Missing or invalid authorization token",
        )
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            // In a sale request a missing product is a caller mistake, not
            // an absent resource: 400, like the reference behavior
            CoreError::ProductNotFound(_) => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::EmptySale => ApiError::new(ErrorCode::ValidationError, err.to_string()),
            CoreError::TicketNotFound(_) => ApiError::not_found(err.to_string()),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, err.to_string())
            }
            CoreError::Validation(_) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field } => {
                ApiError::validation(format!("Duplicate value for {}", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference")
            }
            // Infrastructure failures: log the detail, answer generically
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts checkout coordinator errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Domain(e) => e.into(),
            CheckoutError::Db(e) => e.into(),
        }
    }
}

// =============================================================================
// actix-web Integration
// =============================================================================

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidTransition => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kiosco_core::TicketStatus;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = CoreError::TicketNotFound("t1".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let short: ApiError = CoreError::InsufficientStock {
            name: "Pan Flauta".into(),
            available: 1,
            requested: 4,
        }
        .into();
        assert_eq!(short.status_code(), StatusCode::BAD_REQUEST);

        let bad_move: ApiError = CoreError::InvalidTransition {
            from: TicketStatus::Delivered,
            to: TicketStatus::Ready,
        }
        .into();
        assert_eq!(bad_move.status_code(), StatusCode::CONFLICT);

        assert_eq!(
            ApiError::unauthorized().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_missing_product_in_sale_is_bad_request() {
        let err: ApiError = CoreError::ProductNotFound("ghost".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_infrastructure_detail_is_not_leaked() {
        let err: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
    }
}
