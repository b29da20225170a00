//! # Route Table
//!
//! Wires every endpoint of the kiosk service. The binary and the
//! integration tests both build their `App` through [`configure`], so the
//! route table exists exactly once.

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use crate::error::ApiError;
use crate::AppState;

pub mod pages;
pub mod products;
pub mod sales;
pub mod tickets;

/// The wire shape of every simple success.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessBody {
    pub success: String,
}

impl SuccessBody {
    pub fn new(message: impl Into<String>) -> Self {
        SuccessBody {
            success: message.into(),
        }
    }
}

/// Registers all routes on the given service config.
///
/// ## Usage
/// ```rust,ignore
/// App::new()
///     .app_data(state.clone())
///     .configure(routes::configure)
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed JSON bodies answer with the same {"error": ...} shape
        // as every other classified failure
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::validation(format!("Invalid request body: {err}")).into()
        }))
        // HTML views
        .service(pages::terminal)
        .service(pages::kitchen)
        .service(pages::order_board)
        // JSON API
        .service(
            web::scope("/api")
                .service(health)
                .service(products::lookup_by_barcode)
                .service(products::search)
                .service(sales::register)
                .service(tickets::list_active)
                .service(tickets::create)
                .service(tickets::mark_ready)
                .service(tickets::mark_delivered)
                .service(tickets::mark_notified),
        );
}

#[derive(Debug, Clone, Serialize)]
struct HealthBody {
    status: &'static str,
}

/// Liveness probe: answers 200 while the database responds.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    if state.db.health_check().await {
        HttpResponse::Ok().json(HealthBody { status: "ok" })
    } else {
        HttpResponse::ServiceUnavailable().json(HealthBody { status: "degraded" })
    }
}
