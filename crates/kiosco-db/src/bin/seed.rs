//! # Seed Data Generator
//!
//! Populates the database with kiosk products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p kiosco-db --bin seed
//!
//! # Specify database path and product count
//! cargo run -p kiosco-db --bin seed -- --db ./data/kiosco.db --count 100
//! ```
//!
//! Each product gets a deterministic EAN-13-looking barcode so the same
//! seed run always produces the same scannable codes for manual testing.

use chrono::Utc;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

use kiosco_core::Product;
use kiosco_db::repository::product::generate_product_id;
use kiosco_db::{Database, DbConfig};

/// Kiosk staples: (name, price in cents, stock).
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Leche Entera 1L", 10000, 24),
    ("Leche Descremada 1L", 10500, 12),
    ("Pan Flauta", 4500, 30),
    ("Queso Cremoso x Kg", 32000, 6),
    ("Jamon Cocido x 100g", 8900, 15),
    ("Cafe Molido 500g", 55050, 8),
    ("Azucar 1Kg", 9990, 40),
    ("Yerba Mate 1Kg", 41000, 18),
    ("Gaseosa Cola 2.25L", 19900, 36),
    ("Agua Mineral 2L", 8500, 48),
    ("Galletitas Surtidas", 12300, 25),
    ("Alfajor Triple", 6700, 60),
    ("Medialunas x6", 15000, 10),
    ("Huevos x12", 21000, 14),
    ("Manteca 200g", 13500, 9),
    ("Arroz Largo Fino 1Kg", 11200, 22),
    ("Fideos Spaghetti 500g", 7800, 28),
    ("Aceite Girasol 900ml", 18900, 11),
    ("Mermelada Durazno 450g", 14200, 7),
    ("Sandwich Milanesa", 35000, 5),
];

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (db_path, count) = parse_args();

    info!(db = %db_path, count, "Seeding products");

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(error = %e, "Failed to create database directory");
                return ExitCode::FAILURE;
            }
        }
    }

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let repo = db.products();
    let now = Utc::now();
    let mut inserted = 0u32;

    for i in 0..count {
        let (name, price_cents, stock) = PRODUCTS[i % PRODUCTS.len()];
        // Repeats get a numbered name so the catalog stays browsable
        let name = if i < PRODUCTS.len() {
            name.to_string()
        } else {
            format!("{} #{}", name, i / PRODUCTS.len() + 1)
        };

        let product = Product {
            id: generate_product_id(),
            name,
            barcode: format!("779{:010}", i + 1),
            price_cents,
            stock,
            created_at: now,
            updated_at: now,
        };

        match repo.insert(&product).await {
            Ok(()) => inserted += 1,
            Err(e) => {
                // Duplicate barcodes mean the database was already seeded
                info!(barcode = %product.barcode, error = %e, "Skipping product");
            }
        }
    }

    let total = repo.count().await.unwrap_or(0);
    info!(inserted, total, "Seed complete");
    ExitCode::SUCCESS
}

/// Parses `--db <path>` and `--count <n>` from the command line.
fn parse_args() -> (String, usize) {
    let mut db_path = "./data/kiosco.db".to_string();
    let mut count = PRODUCTS.len();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--count" if i + 1 < args.len() => {
                count = args[i + 1].parse().unwrap_or(PRODUCTS.len());
                i += 2;
            }
            _ => i += 1,
        }
    }

    (db_path, count)
}
