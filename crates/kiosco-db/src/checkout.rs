//! # Checkout: the Sale Transaction Coordinator
//!
//! The one subsystem in this repository with a real invariant to protect.
//! Registers a sale atomically: stock decrements, line snapshots and the
//! sale total all land together, or none of them do.
//!
//! ## Transaction Walk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     register_sale(items)                                │
//! │                                                                         │
//! │  validate: items non-empty, quantities in range      (no tx yet)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ──► INSERT sale (total = 0)   ← first write: takes the DB        │
//! │       │                                write lock, so concurrent        │
//! │       │                                checkouts SERIALIZE here         │
//! │       ▼                                                                 │
//! │  for each item, in input order:                                         │
//! │    load product for update ── missing? ──► rollback, ProductNotFound    │
//! │    stock < quantity? ────────────────────► rollback, InsufficientStock  │
//! │    INSERT line (price snapshot, subtotal = price × qty)                 │
//! │    UPDATE stock - qty (guarded by AND stock >= qty)                     │
//! │    total += subtotal                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE sale total ──► COMMIT ──► return Sale                           │
//! │                                                                         │
//! │  Any error at any step: explicit ROLLBACK, nothing persists,            │
//! │  including decrements already applied for earlier items.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Pessimistic
//! Two terminals selling the last units of the same product must not both
//! succeed. The write transaction lock makes the second checkout wait (up
//! to the pool's busy timeout) and then observe the decremented stock, so
//! it fails with `InsufficientStock` instead of overselling. There is no
//! optimistic retry loop to get wrong.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::sale::{generate_sale_id, generate_sale_line_id};
use kiosco_core::types::line_subtotal;
use kiosco_core::validation::validate_quantity;
use kiosco_core::{CoreError, Money, Sale, SaleLine};

// =============================================================================
// Request / Error Types
// =============================================================================

/// One requested sale item: which product, how many units.
#[derive(Debug, Clone)]
pub struct SaleItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Errors from the checkout coordinator.
///
/// Domain failures (missing product, short stock, empty sale) and
/// infrastructure failures (pool, SQL) reach the boundary as distinct
/// types so the server can map them to 400 vs 500.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// Coordinator
// =============================================================================

/// Registers a sale: one atomic transaction covering the sale row, its
/// lines, the stock decrements and the final total.
///
/// ## Arguments
/// * `items` - requested product/quantity pairs, processed in input order
///
/// ## Returns
/// * `Ok(Sale)` - committed; `total_cents` equals the sum of line subtotals
/// * `Err(CheckoutError::Domain)` - empty sale, bad quantity, unknown
///   product, or insufficient stock; nothing was written
/// * `Err(CheckoutError::Db)` - infrastructure failure; nothing was written
pub async fn register_sale(
    db: &Database,
    items: &[SaleItemRequest],
) -> Result<Sale, CheckoutError> {
    // Validate before opening a transaction; an empty or malformed request
    // should never touch the write lock.
    if items.is_empty() {
        return Err(CoreError::EmptySale.into());
    }
    for item in items {
        validate_quantity(item.quantity).map_err(CoreError::from)?;
    }

    let mut tx = db.pool().begin().await.map_err(DbError::from)?;

    match register_in_tx(db, &mut tx, items).await {
        Ok(sale) => {
            tx.commit().await.map_err(DbError::from)?;
            info!(
                sale_id = %sale.id,
                total_cents = sale.total_cents,
                items = items.len(),
                "Sale registered"
            );
            Ok(sale)
        }
        Err(err) => {
            // Deterministic rollback. Dropping the transaction would roll
            // back too, but an explicit call surfaces rollback failures
            // instead of losing them.
            if let Err(rb_err) = tx.rollback().await {
                warn!(error = %rb_err, "Rollback after failed checkout also failed");
            }
            debug!(error = %err, "Checkout aborted, all writes rolled back");
            Err(err)
        }
    }
}

/// The body of the transaction. Every `?` here propagates to
/// `register_sale`, which owns the commit/rollback decision.
async fn register_in_tx(
    db: &Database,
    tx: &mut Transaction<'static, Sqlite>,
    items: &[SaleItemRequest],
) -> Result<Sale, CheckoutError> {
    let products = db.products();
    let sales = db.sales();
    let now = Utc::now();

    // Placeholder total; finalized below. This INSERT is deliberately the
    // first statement of the transaction (see module docs).
    let sale = Sale {
        id: generate_sale_id(),
        total_cents: 0,
        created_at: now,
    };
    sales.insert(&mut *tx, &sale).await?;

    let mut total = Money::zero();

    for item in items {
        let product = products
            .get_for_update(&mut *tx, &item.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

        if !product.can_sell(item.quantity) {
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock,
                requested: item.quantity,
            }
            .into());
        }

        let subtotal = line_subtotal(product.price(), item.quantity);
        let line = SaleLine {
            id: generate_sale_line_id(),
            sale_id: sale.id.clone(),
            product_id: product.id.clone(),
            quantity: item.quantity,
            unit_price_cents: product.price_cents,
            subtotal_cents: subtotal.cents(),
            created_at: now,
        };
        sales.add_line(&mut *tx, &line).await?;

        // Backstop: the guarded UPDATE re-checks stock at write time.
        // Under the transaction's write lock it cannot disagree with the
        // can_sell check above, but the invariant stays attached to the
        // statement that mutates the row.
        let applied = products
            .decrement_stock(&mut *tx, &product.id, item.quantity)
            .await?;
        if !applied {
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock,
                requested: item.quantity,
            }
            .into());
        }

        total += subtotal;
    }

    sales.set_total(&mut *tx, &sale.id, total.cents()).await?;

    Ok(Sale {
        total_cents: total.cents(),
        ..sale
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use kiosco_core::Product;
    use uuid::Uuid;

    async fn db_with_product(stock: i64, price_cents: i64) -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: "Leche Entera 1L".to_string(),
            barcode: "7790000000001".to_string(),
            price_cents,
            stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        (db, product.id)
    }

    fn item(product_id: &str, quantity: i64) -> SaleItemRequest {
        SaleItemRequest {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_successful_sale_decrements_stock_and_totals() {
        let (db, id) = db_with_product(5, 10000).await;

        let sale = register_sale(&db, &[item(&id, 3)]).await.unwrap();

        assert_eq!(sale.total_cents, 30000);
        assert_eq!(sale.total().to_string(), "300.00");

        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock, 2);

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 30000);

        let lines = db.sales().get_lines(&sale.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].unit_price_cents, 10000);
        assert_eq!(lines[0].subtotal_cents, 30000);
        // invariant: total equals the sum of line subtotals
        let sum: i64 = lines.iter().map(|l| l.subtotal_cents).sum();
        assert_eq!(stored.total_cents, sum);
    }

    #[tokio::test]
    async fn test_price_snapshot_is_frozen() {
        let (db, id) = db_with_product(10, 10000).await;

        let sale = register_sale(&db, &[item(&id, 1)]).await.unwrap();

        // catalog price changes later; the line must not follow
        sqlx::query("UPDATE products SET price_cents = 99999 WHERE id = ?1")
            .bind(&id)
            .execute(db.pool())
            .await
            .unwrap();

        let lines = db.sales().get_lines(&sale.id).await.unwrap();
        assert_eq!(lines[0].unit_price_cents, 10000);
    }

    #[tokio::test]
    async fn test_empty_sale_rejected_without_writes() {
        let (db, _id) = db_with_product(5, 10000).await;

        let err = register_sale(&db, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Domain(CoreError::EmptySale)
        ));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_nonpositive_quantity_rejected() {
        let (db, id) = db_with_product(5, 10000).await;

        let err = register_sale(&db, &[item(&id, 0)]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Domain(CoreError::Validation(_))
        ));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_everything() {
        let (db, id) = db_with_product(5, 10000).await;

        // first item is fine, second references a ghost
        let err = register_sale(&db, &[item(&id, 2), item("ghost", 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Domain(CoreError::ProductNotFound(_))
        ));

        // the first item's decrement must have been rolled back
        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock, 5);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_earlier_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let a = Product {
            id: Uuid::new_v4().to_string(),
            name: "Pan Flauta".to_string(),
            barcode: "7790000000003".to_string(),
            price_cents: 4500,
            stock: 10,
            created_at: now,
            updated_at: now,
        };
        let b = Product {
            id: Uuid::new_v4().to_string(),
            name: "Queso Cremoso".to_string(),
            barcode: "7790000000004".to_string(),
            price_cents: 32000,
            stock: 1,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        let err = register_sale(&db, &[item(&a.id, 4), item(&b.id, 2)])
            .await
            .unwrap_err();
        match err {
            CheckoutError::Domain(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Queso Cremoso");
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // NO product stock changed, including item a processed first
        assert_eq!(db.products().get_by_id(&a.id).await.unwrap().unwrap().stock, 10);
        assert_eq!(db.products().get_by_id(&b.id).await.unwrap().unwrap().stock, 1);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversell_scenario_from_the_terminal() {
        // stock=5, price 100.00: sell 3 → ok; sell 3 again → short
        let (db, id) = db_with_product(5, 10000).await;

        let sale = register_sale(&db, &[item(&id, 3)]).await.unwrap();
        assert_eq!(sale.total().to_string(), "300.00");
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 2);

        let err = register_sale(&db, &[item(&id, 3)]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Domain(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_multi_line_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let a = Product {
            id: Uuid::new_v4().to_string(),
            name: "Cafe Molido 500g".to_string(),
            barcode: "7790000000005".to_string(),
            price_cents: 55050,
            stock: 8,
            created_at: now,
            updated_at: now,
        };
        let b = Product {
            id: Uuid::new_v4().to_string(),
            name: "Azucar 1Kg".to_string(),
            barcode: "7790000000006".to_string(),
            price_cents: 9990,
            stock: 20,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&a).await.unwrap();
        db.products().insert(&b).await.unwrap();

        let sale = register_sale(&db, &[item(&a.id, 2), item(&b.id, 3)])
            .await
            .unwrap();
        // 2×550.50 + 3×99.90 = 1101.00 + 299.70 = 1400.70
        assert_eq!(sale.total_cents, 140070);

        let lines = db.sales().get_lines(&sale.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        let sum: i64 = lines.iter().map(|l| l.subtotal_cents).sum();
        assert_eq!(sum, sale.total_cents);

        assert_eq!(db.products().get_by_id(&a.id).await.unwrap().unwrap().stock, 6);
        assert_eq!(db.products().get_by_id(&b.id).await.unwrap().unwrap().stock, 17);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_checkouts_never_oversell() {
        // Combined quantity (3 + 3) exceeds stock (5): exactly one of two
        // concurrent checkouts may succeed.
        let (db, id) = db_with_product(5, 10000).await;

        let db_a = db.clone();
        let db_b = db.clone();
        let id_a = id.clone();
        let id_b = id.clone();

        let task_a = tokio::spawn(async move {
            register_sale(&db_a, &[item(&id_a, 3)]).await
        });
        let task_b = tokio::spawn(async move {
            register_sale(&db_b, &[item(&id_b, 3)]).await
        });

        let result_a = task_a.await.unwrap();
        let result_b = task_b.await.unwrap();

        let successes = [&result_a, &result_b]
            .iter()
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(successes, 1, "exactly one concurrent checkout may win");

        let loser = if result_a.is_ok() { result_b } else { result_a };
        assert!(matches!(
            loser.unwrap_err(),
            CheckoutError::Domain(CoreError::InsufficientStock { .. })
        ));

        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock, 2);
        assert!(product.stock >= 0);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }
}
