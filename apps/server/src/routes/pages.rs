//! # Page Routes
//!
//! The three HTML views. Pure templates with no business logic — they
//! only poll the JSON API. Embedded with `include_str!` so the binary is
//! self-contained on the kiosk.

use actix_web::http::header::ContentType;
use actix_web::{get, HttpResponse, Responder};

/// Cashier terminal: barcode field, cart, register button.
#[get("/")]
pub async fn terminal() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("../../templates/terminal_de_venta.html"))
}

/// Kitchen display: pending tickets, "listo" button.
#[get("/cocina")]
pub async fn kitchen() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("../../templates/cocina.html"))
}

/// Cashier order board: create tickets, see ready ones, hand them over.
#[get("/caja/pedidos")]
pub async fn order_board() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("../../templates/caja_pedidos.html"))
}
