//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Barcode lookup (the terminal's hot path)
//! - Substring search over name and barcode
//! - Locked read + guarded stock decrement for the checkout transaction
//!
//! ## Search
//! The catalog of a kiosk is a few hundred rows, so search is a plain
//! case-insensitive LIKE over name and barcode, restricted to products
//! with stock, capped at the caller's limit. LIKE wildcards typed by the
//! user are escaped so `%` in a query means a literal percent sign.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kiosco_core::Product;

/// Columns of a full product row, shared by every SELECT here.
const PRODUCT_COLUMNS: &str = "id, name, barcode, price_cents, stock, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let hit = repo.get_by_barcode("7790000000001").await?;
/// let results = repo.search("leche", 10).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its barcode (business key).
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - barcode known
    /// * `Ok(None)` - barcode not in the catalog
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up product by barcode");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product for update, inside a write transaction.
    ///
    /// ## Lock Contract
    /// This is the "acquire for update" capability the checkout
    /// coordinator relies on. SQLite has no row-granular
    /// `SELECT ... FOR UPDATE`; instead, the enclosing transaction must
    /// already hold the database write lock (the coordinator's first
    /// INSERT acquires it), which subsumes a row lock: no other
    /// transaction can read-then-write this row until commit/rollback.
    /// Lock scope therefore covers the row; lock duration is the
    /// transaction.
    pub async fn get_for_update(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Product>> {
        debug!(id = %id, "Loading product for update");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Decrements stock inside a write transaction, guarded against
    /// underflow.
    ///
    /// ## Guarded Update
    /// ```text
    /// UPDATE products
    /// SET stock = stock - ?2
    /// WHERE id = ?1 AND stock >= ?2
    /// ```
    /// The `AND stock >= ?2` predicate means the decrement simply does not
    /// happen when stock is short, independent of what the caller checked
    /// beforehand. Combined with the schema's `CHECK (stock >= 0)` the
    /// stock column cannot go negative by any code path.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock was decremented
    /// * `Ok(false)` - no row matched (product missing or stock short);
    ///   the caller decides which error that is
    pub async fn decrement_stock(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET stock = stock - ?2, updated_at = ?3
             WHERE id = ?1 AND stock >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches products by case-insensitive substring on name OR barcode.
    ///
    /// ## Semantics
    /// - Only products with stock > 0 are returned (the terminal cannot
    ///   sell the others anyway)
    /// - Insertion order (oldest catalog entries first)
    /// - Capped at `limit` rows
    ///
    /// ## Example
    /// ```rust,ignore
    /// // matches "Leche Entera 1L" and "Leche Descremada 1L"
    /// let results = repo.search("leche", 10).await?;
    /// ```
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE (lower(name) LIKE ?1 ESCAPE '\\'
                    OR lower(barcode) LIKE ?1 ESCAPE '\\')
               AND stock > 0
             ORDER BY created_at
             LIMIT ?2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// Used by the seed binary and tests; runtime catalog management is
    /// an external concern.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, name, barcode, price_cents, stock, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces a product's stock level (receiving inventory).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - product doesn't exist
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts catalog rows (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards in user input so they match literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '\\' || c == '%' || c == '_' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
