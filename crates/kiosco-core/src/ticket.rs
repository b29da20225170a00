//! # Kitchen Ticket Status Machine
//!
//! A kitchen ticket moves through an ordered lifecycle:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ticket Lifecycle                                     │
//! │                                                                         │
//! │   cashier creates          kitchen finishes         cashier hands over  │
//! │        │                        │                        │              │
//! │        ▼                        ▼                        ▼              │
//! │   ┌─────────┐  mark_ready  ┌─────────┐ mark_delivered ┌───────────┐    │
//! │   │ Pending │ ───────────► │  Ready  │ ─────────────► │ Delivered │    │
//! │   └─────────┘              └─────────┘                └───────────┘    │
//! │                                                        (terminal)       │
//! │                                                                         │
//! │   `notified` is ORTHOGONAL to status: the cashier acknowledges the      │
//! │   "ready" alert once, idempotently, in any state.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are validated against an explicit table. The underlying
//! store would happily accept any status write; the table is what stops a
//! stale kitchen tab from re-opening a delivered ticket.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Ticket Status
// =============================================================================

/// The status of a kitchen ticket.
///
/// ## Representations
/// - Database: lowercase TEXT (`pending`, `ready`, `delivered`)
/// - Wire: the codes the front-ends already render
///   (`PENDIENTE`, `LISTO`, `ENTREGADO`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum TicketStatus {
    /// Created by the cashier, waiting for the kitchen.
    #[serde(rename = "PENDIENTE")]
    Pending,
    /// Prepared, waiting for pickup at the counter.
    #[serde(rename = "LISTO")]
    Ready,
    /// Handed over. Terminal state.
    #[serde(rename = "ENTREGADO")]
    Delivered,
}

/// The allowed status moves. Anything not listed here is rejected with
/// [`CoreError::InvalidTransition`].
const TRANSITIONS: &[(TicketStatus, TicketStatus)] = &[
    (TicketStatus::Pending, TicketStatus::Ready),
    (TicketStatus::Ready, TicketStatus::Delivered),
];

impl TicketStatus {
    /// Checks whether `self -> to` appears in the transition table.
    pub fn can_advance(self, to: TicketStatus) -> bool {
        TRANSITIONS.contains(&(self, to))
    }

    /// Validates and performs a status move.
    ///
    /// ## Returns
    /// * `Ok(to)` - the move is in the transition table
    /// * `Err(CoreError::InvalidTransition)` - anything else, including
    ///   self-transitions and backward moves
    pub fn advance(self, to: TicketStatus) -> CoreResult<TicketStatus> {
        if self.can_advance(to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition { from: self, to })
        }
    }

    /// Whether the ticket should appear on the kitchen display and the
    /// order board (`Pending` or `Ready`).
    pub fn is_active(self) -> bool {
        matches!(self, TicketStatus::Pending | TicketStatus::Ready)
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Delivered)
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Pending
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
