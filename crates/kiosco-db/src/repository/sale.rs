//! # Sale Repository
//!
//! Persistence for sales and their lines.
//!
//! Writes only make sense inside the checkout transaction, so every write
//! method takes a `&mut SqliteConnection`; nothing here commits. The reads
//! run on the pool and serve tests and future reporting.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kiosco_core::{Sale, SaleLine};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale row.
    ///
    /// The checkout coordinator calls this FIRST inside its transaction:
    /// the INSERT is the transaction's initial write, which is what
    /// acquires the database write lock and serializes concurrent
    /// checkouts.
    pub async fn insert(&self, conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, "Inserting sale");

        sqlx::query("INSERT INTO sales (id, total_cents, created_at) VALUES (?1, ?2, ?3)")
            .bind(&sale.id)
            .bind(sale.total_cents)
            .bind(sale.created_at)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Adds a line to a sale.
    ///
    /// ## Snapshot Pattern
    /// `unit_price_cents` is the catalog price frozen at this moment;
    /// the sale history stays correct when the catalog price changes.
    pub async fn add_line(&self, conn: &mut SqliteConnection, line: &SaleLine) -> DbResult<()> {
        debug!(sale_id = %line.sale_id, product_id = %line.product_id, "Adding sale line");

        sqlx::query(
            "INSERT INTO sale_lines
                 (id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&line.id)
        .bind(&line.sale_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Finalizes the sale total.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - sale doesn't exist in this transaction
    pub async fn set_total(
        &self,
        conn: &mut SqliteConnection,
        sale_id: &str,
        total_cents: i64,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(sale_id)
            .bind(total_cents)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, total_cents, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all lines for a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            "SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents, created_at
             FROM sale_lines
             WHERE sale_id = ?1
             ORDER BY created_at, id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts registered sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale line ID.
pub fn generate_sale_line_id() -> String {
    Uuid::new_v4().to_string()
}
