//! # Kitchen Ticket Repository
//!
//! Persistence for the kitchen ticket queue.
//!
//! The repository is deliberately dumb about the lifecycle: it stores
//! whatever status it is given. Transition validity is decided by
//! [`kiosco_core::TicketStatus::advance`] before any write reaches here,
//! so the one place that knows the lifecycle is the core state machine.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kiosco_core::{KitchenTicket, TicketStatus};

/// Columns of a full ticket row.
const TICKET_COLUMNS: &str = "id, description, status, notified, created_at";

/// Repository for kitchen ticket operations.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Creates a new ticket in `Pending` with `notified = false`.
    ///
    /// The description must already be validated
    /// ([`kiosco_core::validation::validate_description`]).
    pub async fn create(&self, description: &str) -> DbResult<KitchenTicket> {
        let ticket = KitchenTicket {
            id: Uuid::new_v4().to_string(),
            description: description.trim().to_string(),
            status: TicketStatus::Pending,
            notified: false,
            created_at: Utc::now(),
        };

        debug!(id = %ticket.id, "Creating kitchen ticket");

        sqlx::query(
            "INSERT INTO kitchen_tickets (id, description, status, notified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&ticket.id)
        .bind(&ticket.description)
        .bind(ticket.status)
        .bind(ticket.notified)
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<KitchenTicket>> {
        let ticket = sqlx::query_as::<_, KitchenTicket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM kitchen_tickets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Lists active tickets (`Pending` and `Ready`), oldest first.
    ///
    /// This is the polling query behind both the kitchen display and the
    /// cashier order board. Delivered tickets never appear.
    pub async fn list_active(&self) -> DbResult<Vec<KitchenTicket>> {
        let tickets = sqlx::query_as::<_, KitchenTicket>(&format!(
            "SELECT {TICKET_COLUMNS} FROM kitchen_tickets
             WHERE status IN (?1, ?2)
             ORDER BY created_at, id"
        ))
        .bind(TicketStatus::Pending)
        .bind(TicketStatus::Ready)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    /// Writes a ticket's status.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - ticket doesn't exist
    pub async fn set_status(&self, id: &str, status: TicketStatus) -> DbResult<()> {
        debug!(id = %id, ?status, "Updating ticket status");

        let result = sqlx::query("UPDATE kitchen_tickets SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket", id));
        }

        Ok(())
    }

    /// Sets the cashier-notified flag. Idempotent.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - ticket doesn't exist
    pub async fn set_notified(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Marking ticket notified");

        let result = sqlx::query("UPDATE kitchen_tickets SET notified = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ticket", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
