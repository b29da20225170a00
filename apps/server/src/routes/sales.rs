//! # Sale Routes
//!
//! Sale registration: the terminal posts its cart, the checkout
//! coordinator does the rest inside one transaction.

use actix_web::web::{Data, Json};
use actix_web::{post, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiosco_db::checkout::{self, SaleItemRequest};

use crate::auth::require_write_access;
use crate::error::ApiError;
use crate::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// One cart row as the terminal sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemBody {
    /// Product id.
    pub id: String,
    /// Units; a missing field means a single unit.
    #[serde(default = "default_quantity")]
    pub cantidad: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Request body: the whole cart in one shot.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterSaleBody {
    #[serde(default)]
    pub items: Vec<SaleItemBody>,
}

/// 201 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSaleResponse {
    pub success: String,
    pub venta_id: String,
}

// =============================================================================
// Handler
// =============================================================================

/// Registers a sale.
///
/// ## Responses
/// * 201 `{success, venta_id}` - committed
/// * 400 `{error}` - empty cart, unknown product, bad quantity,
///   insufficient stock (nothing was written)
#[post("/registrar_venta")]
pub async fn register(
    state: Data<AppState>,
    req: HttpRequest,
    body: Json<RegisterSaleBody>,
) -> Result<HttpResponse, ApiError> {
    require_write_access(&req, &state.config)?;

    debug!(items = body.items.len(), "Sale registration requested");

    let items: Vec<SaleItemRequest> = body
        .items
        .iter()
        .map(|item| SaleItemRequest {
            product_id: item.id.clone(),
            quantity: item.cantidad,
        })
        .collect();

    let sale = checkout::register_sale(&state.db, &items).await?;

    Ok(HttpResponse::Created().json(RegisterSaleResponse {
        success: "Sale registered".to_string(),
        venta_id: sale.id,
    }))
}
