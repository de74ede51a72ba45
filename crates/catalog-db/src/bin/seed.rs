//! # Seed Data Generator
//!
//! Populates the database with a demonstration catalog for development.
//!
//! ## Usage
//! ```bash
//! # Default database path
//! cargo run -p catalog-db --bin seed
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//!
//! # Nothing but the top-level categories
//! cargo run -p catalog-db --bin seed -- --flat
//! ```
//!
//! ## Generated Catalog
//! ```text
//! Fruits
//! ├── Citrus
//! │   └── Lemons      (Eureka, Meyer)
//! ├── Berries         (Strawberry, Blueberry, Raspberry)
//! └── Orchard         (Apple, Pear)
//! Legumes             (Lentils, Chickpeas)
//! └── Beans           (Kidney, Black, Broad)
//! Herbs               (Basil, Mint, Parsley)
//! ```

use std::env;

use catalog_core::CategoryId;
use catalog_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (label, parent label, products as (label, description))
type SeedCategory = (
    &'static str,
    Option<&'static str>,
    &'static [(&'static str, &'static str)],
);

/// Parents always come before their children.
const CATALOG: &[SeedCategory] = &[
    ("Fruits", None, &[]),
    ("Citrus", Some("Fruits"), &[]),
    (
        "Lemons",
        Some("Citrus"),
        &[
            ("Eureka", "Classic sour lemon, thick skin"),
            ("Meyer", "Sweeter lemon, thin skin"),
        ],
    ),
    (
        "Berries",
        Some("Fruits"),
        &[
            ("Strawberry", "Red, sold by the punnet"),
            ("Blueberry", "Small, sold by the tray"),
            ("Raspberry", "Fragile, keep chilled"),
        ],
    ),
    (
        "Orchard",
        Some("Fruits"),
        &[
            ("Apple", "Crisp dessert apple"),
            ("Pear", "Ripens off the tree"),
        ],
    ),
    (
        "Legumes",
        None,
        &[
            ("Lentils", "Green, dried"),
            ("Chickpeas", "Dried, soak overnight"),
        ],
    ),
    (
        "Beans",
        Some("Legumes"),
        &[
            ("Kidney", "Red kidney beans, dried"),
            ("Black", "Black turtle beans, dried"),
            ("Broad", "Fresh in season"),
        ],
    ),
    (
        "Herbs",
        None,
        &[
            ("Basil", "Potted, sweet Genovese"),
            ("Mint", "Cut bunch"),
            ("Parsley", "Flat leaf, cut bunch"),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./catalog_dev.db");
    let mut flat = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--flat" => flat = true,
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("      --flat         Only create the top-level categories");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.categories().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} categories", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut created: Vec<(&str, CategoryId)> = Vec::new();
    let mut products = 0;

    for (label, parent, items) in CATALOG {
        if flat && parent.is_some() {
            continue;
        }

        let parent_id = match parent {
            Some(parent_label) => created
                .iter()
                .find(|(l, _)| l == parent_label)
                .map(|(_, id)| *id),
            None => None,
        };

        let category = db.categories().add(label, parent_id).await?;
        created.push((*label, category.id));

        for (product, description) in items.iter() {
            if let Err(e) = db.products().add(product, description, category.id).await {
                eprintln!("Failed to insert {}: {}", product, e);
                continue;
            }
            products += 1;
        }
    }

    println!();
    println!(
        "✓ Created {} categories and {} products in {:?}",
        created.len(),
        products,
        start.elapsed()
    );

    println!();
    for row in db.categories().tree().await? {
        println!("  {}{}", "  ".repeat(row.depth), row.category.label);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
