//! # Kitchen Ticket Routes
//!
//! The ticket queue as the two polling front-ends see it.
//!
//! ## Who Calls What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order board (cashier)              Kitchen display                     │
//! │  ────────────────────               ───────────────                     │
//! │  POST /pedidos/crear                GET  /pedidos            (poll)     │
//! │  GET  /pedidos          (poll)      POST /pedidos/marcar_listo/{id}     │
//! │  POST /pedidos/marcar_entregado/{id}                                    │
//! │  POST /pedidos/marcar_notificado/{id}                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status moves are validated by the core transition table before any
//! write: a stale tab re-marking a delivered ticket gets a 409, not a
//! silent overwrite.

use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiosco_core::validation::validate_description;
use kiosco_core::{CoreError, KitchenTicket, TicketStatus};
use kiosco_db::Database;

use crate::auth::require_write_access;
use crate::error::ApiError;
use crate::routes::SuccessBody;
use crate::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// A ticket as the front-ends render it.
/// `estado` serializes as `PENDIENTE` / `LISTO` / `ENTREGADO`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDto {
    pub id: String,
    pub descripcion: String,
    pub estado: TicketStatus,
    pub fecha_hora_creacion: DateTime<Utc>,
    pub notificado_caja: bool,
}

impl From<KitchenTicket> for TicketDto {
    fn from(t: KitchenTicket) -> Self {
        TicketDto {
            id: t.id,
            descripcion: t.description,
            estado: t.status,
            fecha_hora_creacion: t.created_at,
            notificado_caja: t.notified,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketBody {
    pub descripcion: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Lists active tickets (Pending and Ready), oldest first.
#[get("/pedidos")]
pub async fn list_active(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let tickets = state.db.tickets().list_active().await?;
    let dtos: Vec<TicketDto> = tickets.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(dtos))
}

/// Creates a ticket from the order board.
///
/// ## Responses
/// * 200 `{success}` - created in Pending
/// * 400 `{error}` - missing or blank description
#[post("/pedidos/crear")]
pub async fn create(
    state: Data<AppState>,
    req: HttpRequest,
    body: Json<CreateTicketBody>,
) -> Result<HttpResponse, ApiError> {
    require_write_access(&req, &state.config)?;

    validate_description(&body.descripcion).map_err(CoreError::from)?;

    let ticket = state.db.tickets().create(&body.descripcion).await?;
    debug!(id = %ticket.id, "Ticket created");

    Ok(HttpResponse::Ok().json(SuccessBody::new("Ticket created")))
}

/// Kitchen marks a ticket ready for pickup.
#[post("/pedidos/marcar_listo/{id}")]
pub async fn mark_ready(
    state: Data<AppState>,
    req: HttpRequest,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    require_write_access(&req, &state.config)?;

    transition(&state.db, &path.into_inner(), TicketStatus::Ready).await?;
    Ok(HttpResponse::Ok().json(SuccessBody::new("Ticket marked ready")))
}

/// Cashier marks a ticket delivered (drops it off both views).
#[post("/pedidos/marcar_entregado/{id}")]
pub async fn mark_delivered(
    state: Data<AppState>,
    req: HttpRequest,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    require_write_access(&req, &state.config)?;

    transition(&state.db, &path.into_inner(), TicketStatus::Delivered).await?;
    Ok(HttpResponse::Ok().json(SuccessBody::new("Ticket marked delivered")))
}

/// Cashier acknowledges the "ready" alert. Idempotent in any state.
#[post("/pedidos/marcar_notificado/{id}")]
pub async fn mark_notified(
    state: Data<AppState>,
    req: HttpRequest,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    require_write_access(&req, &state.config)?;

    let id = path.into_inner();
    state.db.tickets().set_notified(&id).await?;
    Ok(HttpResponse::Ok().json(SuccessBody::new("Ticket marked notified")))
}

// =============================================================================
// Shared Transition Logic
// =============================================================================

/// Loads a ticket, validates the status move against the core transition
/// table, and persists it.
///
/// ## Errors
/// * 404 - ticket id unknown
/// * 409 - move not in the transition table
async fn transition(db: &Database, id: &str, to: TicketStatus) -> Result<(), ApiError> {
    let tickets = db.tickets();

    let ticket = tickets
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::from(CoreError::TicketNotFound(id.to_string())))?;

    let next = ticket.status.advance(to).map_err(ApiError::from)?;
    tickets.set_status(id, next).await?;

    debug!(id = %id, from = ?ticket.status, to = ?next, "Ticket transitioned");
    Ok(())
}
