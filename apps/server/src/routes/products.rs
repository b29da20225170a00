//! # Product Routes
//!
//! The cashier terminal's lookups: barcode resolution on scan, substring
//! search when the barcode won't read.
//!
//! ## Lookup Flow
//! ```text
//! scan "7790000000001"
//!      │
//!      ▼
//! GET /api/producto/7790000000001
//!      │
//!      ├── known, stock > 0 ──► 200 {id, nombre, precio, stock}
//!      ├── known, stock = 0 ──► 404 {"error": "Product out of stock"}
//!      └── unknown          ──► 404 {"error": "Product not found"}
//! ```

use actix_web::web::{Data, Path, Query};
use actix_web::{get, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiosco_core::validation::validate_barcode;
use kiosco_core::{CoreError, Product};

use crate::error::ApiError;
use crate::AppState;

/// Search results are capped here regardless of what the client asks for.
const MAX_SEARCH_RESULTS: u32 = 10;

// =============================================================================
// DTOs
// =============================================================================

/// Barcode lookup response. `precio` is a fixed-point decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLookupDto {
    pub id: String,
    pub nombre: String,
    pub precio: String,
    pub stock: i64,
}

impl From<Product> for ProductLookupDto {
    fn from(p: Product) -> Self {
        ProductLookupDto {
            precio: p.price().to_string(),
            id: p.id,
            nombre: p.name,
            stock: p.stock,
        }
    }
}

/// Search result row; includes the barcode so the terminal can add the
/// product to the cart as if it had been scanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchDto {
    pub id: String,
    pub nombre: String,
    pub codigo_barras: String,
    pub precio: String,
    pub stock: i64,
}

impl From<Product> for ProductSearchDto {
    fn from(p: Product) -> Self {
        ProductSearchDto {
            precio: p.price().to_string(),
            id: p.id,
            nombre: p.name,
            codigo_barras: p.barcode,
            stock: p.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolves a scanned barcode to a sellable product.
///
/// Products with zero stock answer 404 like unknown barcodes: the
/// terminal treats both as "can't sell this", just with different
/// messages.
#[get("/producto/{codigo_barras}")]
pub async fn lookup_by_barcode(
    state: Data<AppState>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let barcode = path.into_inner();
    validate_barcode(&barcode).map_err(CoreError::from)?;

    debug!(barcode = %barcode, "Barcode lookup");

    let product = state.db.products().get_by_barcode(&barcode).await?;

    match product {
        Some(p) if p.in_stock() => Ok(HttpResponse::Ok().json(ProductLookupDto::from(p))),
        Some(_) => Err(ApiError::not_found("Product out of stock")),
        None => Err(ApiError::not_found("Product not found")),
    }
}

/// Substring search over name and barcode.
///
/// No query (or a blank one) is not an error: the terminal clears its
/// result list on an empty input, so it gets an empty array.
#[get("/buscar_productos")]
pub async fn search(
    state: Data<AppState>,
    params: Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let query = params.q.as_deref().unwrap_or("").trim();

    if query.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<ProductSearchDto>::new()));
    }

    let products = state
        .db
        .products()
        .search(query, MAX_SEARCH_RESULTS)
        .await?;

    let results: Vec<ProductSearchDto> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(results))
}
