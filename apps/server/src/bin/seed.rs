//! Development seed tool.
//!
//! Populates the configured database with a small catalog so the cashier
//! flow can be exercised immediately:
//!
//! ```text
//! cargo run --bin seed
//! ```
//!
//! Safe to re-run: duplicate barcodes are skipped, not overwritten.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kasir_db::{Database, DbConfig, ProductInput};
use kasir_server::ServerConfig;

const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    // (barcode, title, buy_price, sell_price, stock)
    ("8991234560017", "Kopi Susu Botol", 3_000, 5_000, 50),
    ("8991234560024", "Teh Botol", 2_000, 4_000, 80),
    ("8991234560031", "Air Mineral 600ml", 1_500, 3_000, 120),
    ("8991234560048", "Roti Coklat", 4_000, 7_000, 30),
    ("8991234560055", "Mie Instan Goreng", 2_500, 3_500, 100),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::load()?;
    info!(database = %config.database_path, "Seeding database");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let category = match db.categories().list().await?.into_iter().next() {
        Some(existing) => existing,
        None => {
            db.categories()
                .insert("Sembako", "Kebutuhan sehari-hari")
                .await?
        }
    };

    let mut inserted = 0;
    for (barcode, title, buy_price, sell_price, stock) in PRODUCTS {
        if db.products().get_by_barcode(barcode).await?.is_some() {
            warn!(barcode, "Barcode already present, skipping");
            continue;
        }

        db.products()
            .insert(ProductInput {
                barcode: barcode.to_string(),
                title: title.to_string(),
                description: None,
                category_id: category.id.clone(),
                buy_price: *buy_price,
                sell_price: *sell_price,
                stock: *stock,
            })
            .await?;
        inserted += 1;
    }

    if db.customers().list().await?.is_empty() {
        db.customers()
            .insert("Budi Santoso", "081200011122", "Jl. Merdeka No. 1")
            .await?;
        db.customers()
            .insert("Siti Aminah", "081200033344", "Jl. Sudirman No. 7")
            .await?;
    }

    info!(inserted, "Seed complete");
    Ok(())
}
