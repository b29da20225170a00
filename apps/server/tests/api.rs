//! Integration tests for the HTTP surface.
//!
//! Each test builds the full actix `App` over an isolated in-memory
//! database, so what is exercised here is exactly what the kiosk runs:
//! routing, DTO shapes, status codes and the checkout transaction behind
//! them.

use actix_web::http::header;
use actix_web::{test, web, App};
use chrono::Utc;
use serde_json::{json, Value};

use kiosco_core::Product;
use kiosco_db::{Database, DbConfig};
use kiosco_server::config::ServerConfig;
use kiosco_server::{routes, AppState};

// =============================================================================
// Helpers
// =============================================================================

fn test_config(api_token: Option<&str>) -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1".to_string(),
        http_port: 0,
        database_path: ":memory:".to_string(),
        db_max_connections: 1,
        api_token: api_token.map(str::to_string),
    }
}

async fn test_state(api_token: Option<&str>) -> web::Data<AppState> {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    web::Data::new(AppState {
        db,
        config: test_config(api_token),
    })
}

async fn insert_product(db: &Database, name: &str, barcode: &str, price_cents: i64, stock: i64) -> String {
    let now = Utc::now();
    let product = Product {
        id: uuid_like(barcode),
        name: name.to_string(),
        barcode: barcode.to_string(),
        price_cents,
        stock,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product.id
}

/// Deterministic per-barcode id so tests can reference products easily.
fn uuid_like(seed: &str) -> String {
    format!("00000000-0000-4000-8000-{:0>12}", &seed[seed.len().saturating_sub(12)..])
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(routes::configure),
        )
        .await
    };
}

// =============================================================================
// Product Lookup & Search
// =============================================================================

#[actix_web::test]
async fn barcode_lookup_returns_product_with_decimal_price() {
    let state = test_state(None).await;
    insert_product(&state.db, "Leche Entera 1L", "7790000000001", 10000, 5).await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/producto/7790000000001")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["nombre"], "Leche Entera 1L");
    assert_eq!(body["precio"], "100.00");
    assert_eq!(body["stock"], 5);
}

#[actix_web::test]
async fn barcode_lookup_unknown_and_out_of_stock_are_404() {
    let state = test_state(None).await;
    insert_product(&state.db, "Pan Flauta", "7790000000003", 4500, 0).await;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/producto/0000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Product not found");

    let req = test::TestRequest::get()
        .uri("/api/producto/7790000000003")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Product out of stock");
}

#[actix_web::test]
async fn search_filters_by_substring_stock_and_cap() {
    let state = test_state(None).await;
    insert_product(&state.db, "Leche Entera 1L", "7790000000001", 10000, 5).await;
    insert_product(&state.db, "Leche Descremada 1L", "7790000000002", 10500, 0).await;
    insert_product(&state.db, "Pan Flauta", "7790000000003", 4500, 12).await;
    let app = app!(state);

    // case-insensitive substring on name; out-of-stock rows skipped
    let req = test::TestRequest::get()
        .uri("/api/buscar_productos?q=LECHE")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["nombre"], "Leche Entera 1L");
    assert_eq!(rows[0]["codigo_barras"], "7790000000001");

    // no query -> empty array, not an error
    let req = test::TestRequest::get().uri("/api/buscar_productos").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn search_caps_at_ten_results() {
    let state = test_state(None).await;
    for i in 0..12 {
        insert_product(
            &state.db,
            &format!("Gaseosa Cola {i}"),
            &format!("77912345000{i:02}"),
            8000,
            10,
        )
        .await;
    }
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/buscar_productos?q=gaseosa")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 10);
}

// =============================================================================
// Sale Registration
// =============================================================================

#[actix_web::test]
async fn register_sale_decrements_stock_and_returns_201() {
    let state = test_state(None).await;
    let product_id = insert_product(&state.db, "Leche Entera 1L", "7790000000001", 10000, 5).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [{ "id": product_id, "cantidad": 3 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["venta_id"].is_string());
    let sale_id = body["venta_id"].as_str().unwrap().to_string();

    // stock decremented exactly by quantity
    let product = state.db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 2);

    // total equals sum of line subtotals
    let sale = state.db.sales().get_by_id(&sale_id).await.unwrap().unwrap();
    assert_eq!(sale.total_cents, 30000);
    let lines = state.db.sales().get_lines(&sale_id).await.unwrap();
    let sum: i64 = lines.iter().map(|l| l.subtotal_cents).sum();
    assert_eq!(sum, sale.total_cents);
}

#[actix_web::test]
async fn register_sale_quantity_defaults_to_one() {
    let state = test_state(None).await;
    let product_id = insert_product(&state.db, "Alfajor Triple", "7790000000007", 6700, 10).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [{ "id": product_id }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let product = state.db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 9);
}

#[actix_web::test]
async fn register_sale_empty_cart_is_400_with_no_writes() {
    let state = test_state(None).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    assert_eq!(state.db.sales().count().await.unwrap(), 0);
}

#[actix_web::test]
async fn register_sale_unknown_product_is_400() {
    let state = test_state(None).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [{ "id": "ghost", "cantidad": 1 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn register_sale_insufficient_stock_rolls_back_fully() {
    let state = test_state(None).await;
    let a = insert_product(&state.db, "Pan Flauta", "7790000000003", 4500, 10).await;
    let b = insert_product(&state.db, "Queso Cremoso x Kg", "7790000000004", 32000, 1).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [
            { "id": a, "cantidad": 4 },
            { "id": b, "cantidad": 2 }
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Queso Cremoso"), "got: {message}");

    // no stock changed, not even for the first item
    assert_eq!(state.db.products().get_by_id(&a).await.unwrap().unwrap().stock, 10);
    assert_eq!(state.db.products().get_by_id(&b).await.unwrap().unwrap().stock, 1);
    assert_eq!(state.db.sales().count().await.unwrap(), 0);
}

#[actix_web::test]
async fn register_sale_twice_hits_insufficient_stock_second_time() {
    // Terminal scenario: stock 5 at 100.00, sell 3, then try to sell 3 again
    let state = test_state(None).await;
    let id = insert_product(&state.db, "Leche Entera 1L", "7790000000001", 10000, 5).await;
    let app = app!(state);

    let first = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [{ "id": id, "cantidad": 3 }] }))
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 201);

    let second = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .set_json(json!({ "items": [{ "id": id, "cantidad": 3 }] }))
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(state.db.products().get_by_id(&id).await.unwrap().unwrap().stock, 2);
}

#[actix_web::test]
async fn register_sale_malformed_body_is_400_with_error_shape() {
    let state = test_state(None).await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/registrar_venta")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

// =============================================================================
// Kitchen Tickets
// =============================================================================

#[actix_web::test]
async fn ticket_lifecycle_create_ready_delivered() {
    let state = test_state(None).await;
    let app = app!(state);

    // create
    let req = test::TestRequest::post()
        .uri("/api/pedidos/crear")
        .set_json(json!({ "descripcion": "Sandwich milanesa completo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // appears in the active list as PENDIENTE
    let req = test::TestRequest::get().uri("/api/pedidos").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["estado"], "PENDIENTE");
    assert_eq!(rows[0]["notificado_caja"], false);
    let id = rows[0]["id"].as_str().unwrap().to_string();

    // kitchen marks it ready
    let req = test::TestRequest::post()
        .uri(&format!("/api/pedidos/marcar_listo/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/api/pedidos").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.as_array().unwrap()[0]["estado"], "LISTO");

    // cashier delivers it; it leaves the active list
    let req = test::TestRequest::post()
        .uri(&format!("/api/pedidos/marcar_entregado/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/api/pedidos").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn tickets_list_oldest_first() {
    let state = test_state(None).await;
    let app = app!(state);

    for descripcion in ["Tostado", "Cafe con leche", "Medialunas"] {
        let req = test::TestRequest::post()
            .uri("/api/pedidos/crear")
            .set_json(json!({ "descripcion": descripcion }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }

    let req = test::TestRequest::get().uri("/api/pedidos").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let descriptions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["descripcion"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Tostado", "Cafe con leche", "Medialunas"]);
}

#[actix_web::test]
async fn ticket_create_requires_description() {
    let state = test_state(None).await;
    let app = app!(state);

    // blank description
    let req = test::TestRequest::post()
        .uri("/api/pedidos/crear")
        .set_json(json!({ "descripcion": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // missing field entirely
    let req = test::TestRequest::post()
        .uri("/api/pedidos/crear")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn ticket_transitions_on_missing_id_are_404() {
    let state = test_state(None).await;
    let app = app!(state);

    for path in [
        "/api/pedidos/marcar_listo/nope",
        "/api/pedidos/marcar_entregado/nope",
        "/api/pedidos/marcar_notificado/nope",
    ] {
        let req = test::TestRequest::post().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404, "path: {path}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn out_of_order_transitions_are_409() {
    let state = test_state(None).await;
    let ticket = state.db.tickets().create("Licuado de banana").await.unwrap();
    let app = app!(state);

    // Pending -> Delivered skips Ready
    let req = test::TestRequest::post()
        .uri(&format!("/api/pedidos/marcar_entregado/{}", ticket.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // drive it to Delivered properly, then try to re-open
    for path in ["marcar_listo", "marcar_entregado"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/pedidos/{}/{}", path, ticket.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
    let req = test::TestRequest::post()
        .uri(&format!("/api/pedidos/marcar_listo/{}", ticket.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid ticket transition"));
}

#[actix_web::test]
async fn mark_notified_is_idempotent() {
    let state = test_state(None).await;
    let ticket = state.db.tickets().create("Cafe doble").await.unwrap();
    let app = app!(state);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/pedidos/marcar_notificado/{}", ticket.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }

    let loaded = state.db.tickets().get_by_id(&ticket.id).await.unwrap().unwrap();
    assert!(loaded.notified);
}

// =============================================================================
// Authorization
// =============================================================================

#[actix_web::test]
async fn writes_require_token_when_configured() {
    let state = test_state(Some("kiosk-secret")).await;
    insert_product(&state.db, "Leche Entera 1L", "7790000000001", 10000, 5).await;
    let app = app!(state);

    // write without token -> 401, nothing mutated
    let req = test::TestRequest::post()
        .uri("/api/pedidos/crear")
        .set_json(json!({ "descripcion": "Tostado" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert!(state.db.tickets().list_active().await.unwrap().is_empty());

    // write with token -> ok
    let req = test::TestRequest::post()
        .uri("/api/pedidos/crear")
        .insert_header((header::AUTHORIZATION, "Bearer kiosk-secret"))
        .set_json(json!({ "descripcion": "Tostado" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // reads stay open
    let req = test::TestRequest::get().uri("/api/pedidos").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
    let req = test::TestRequest::get()
        .uri("/api/producto/7790000000001")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}

// =============================================================================
// Health & Pages
// =============================================================================

#[actix_web::test]
async fn health_answers_ok() {
    let state = test_state(None).await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn pages_render_html() {
    let state = test_state(None).await;
    let app = app!(state);

    for path in ["/", "/cocina", "/caja/pedidos"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200, "path: {path}");
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"), "path: {path}");
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"<!DOCTYPE html>"));
    }
}
