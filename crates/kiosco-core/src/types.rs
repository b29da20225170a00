//! # Domain Types
//!
//! Core domain types for the kiosk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  sale_id (FK)   │       │
//! │  │  barcode (biz)  │   │  total_cents    │   │  product_id(FK) │       │
//! │  │  price_cents    │   │  created_at     │   │  price snapshot │       │
//! │  │  stock          │   └─────────────────┘   │  subtotal_cents │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  KitchenTicket  │   │  TicketStatus   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  description    │   │  Pending        │                             │
//! │  │  status         │   │  Ready          │                             │
//! │  │  notified       │   │  Delivered      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an immutable UUID v4 `id` used for relations; products
//! additionally carry the scanned `barcode` as their business key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::ticket::TicketStatus;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale at the kiosk.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown at the terminal and in search results.
    pub name: String,

    /// Unique barcode scanned to resolve the product.
    pub barcode: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units currently in inventory. Never negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Whether the product should be offered at the terminal at all.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One registered checkout.
///
/// Created and finalized inside a single transaction; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Derived: sum of the sale's line subtotals.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern: the unit price is frozen at the moment of
/// sale and does not follow later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Units sold. Always positive.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents. Recomputed on every write.
    pub subtotal_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// Computes a line subtotal from a price snapshot and quantity.
///
/// The single place the `price × quantity` rule lives; the coordinator and
/// the tests both use it.
#[inline]
pub fn line_subtotal(unit_price: Money, quantity: i64) -> Money {
    unit_price * quantity
}

// =============================================================================
// Kitchen Ticket
// =============================================================================

/// A unit of kitchen work tracked from creation through preparation to
/// pickup.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct KitchenTicket {
    pub id: String,

    /// Free text, e.g. "Sandwich milanesa completo".
    pub description: String,

    pub status: TicketStatus,

    /// Whether the cashier has acknowledged the "ready" alert.
    /// Orthogonal to `status`; set once, idempotently.
    pub notified: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        let now = chrono::Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Leche Entera 1L".to_string(),
            barcode: "7790000000001".to_string(),
            price_cents: 10000,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_sell_bounds() {
        let p = product(5);
        assert!(p.can_sell(5));
        assert!(p.can_sell(1));
        assert!(!p.can_sell(6));
        assert!(p.in_stock());
        assert!(!product(0).in_stock());
    }

    #[test]
    fn test_line_subtotal() {
        let subtotal = line_subtotal(Money::from_cents(10000), 3);
        assert_eq!(subtotal.cents(), 30000);
        assert_eq!(subtotal.to_string(), "300.00");
    }
}
