//! # Seed Data Generator
//!
//! Populates the database with test users and products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p shopfront-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p shopfront-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p shopfront-db --bin seed -- --db ./data/shopfront.db
//! ```
//!
//! Also creates two fixed accounts so the API can be exercised right
//! away: `admin` (admin role) and `demo` (customer role).

use std::env;

use shopfront_core::Role;
use shopfront_db::{Database, DbConfig};

/// Product families for realistic test data.
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "Audio",
        &[
            "Wireless Earbuds",
            "Over-Ear Headphones",
            "Bluetooth Speaker",
            "Soundbar",
            "Turntable",
            "Studio Microphone",
            "Guitar Amp",
            "MIDI Keyboard",
        ],
    ),
    (
        "Home",
        &[
            "French Press",
            "Espresso Machine",
            "Stand Mixer",
            "Air Fryer",
            "Robot Vacuum",
            "Desk Lamp",
            "Standing Desk",
            "Office Chair",
        ],
    ),
    (
        "Outdoors",
        &[
            "Camping Tent",
            "Sleeping Bag",
            "Hiking Backpack",
            "Water Bottle",
            "Trail Shoes",
            "Headlamp",
            "Camp Stove",
            "Trekking Poles",
        ],
    ),
    (
        "Gadgets",
        &[
            "Mechanical Keyboard",
            "Gaming Mouse",
            "4K Webcam",
            "USB-C Hub",
            "Portable SSD",
            "E-Reader",
            "Smart Watch",
            "Drawing Tablet",
        ],
    ),
];

/// Size/variant suffixes with price addons in cents.
const VARIANTS: &[(&str, i64)] = &[
    ("Basic", 0),
    ("Plus", 1500),
    ("Pro", 4000),
    ("Max", 8000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./shopfront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopfront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./shopfront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shopfront Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Idempotence: refuse to seed on top of existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Creating accounts...");
    let admin = db.users().create("admin", "admin@shopfront.dev", Role::Admin).await?;
    let demo = db.users().create("demo", "demo@shopfront.dev", Role::Customer).await?;
    println!("  admin: {}", admin.id);
    println!("  demo:  {}", demo.id);

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (family, names) in FAMILIES {
        for name in *names {
            for (variant, price_addon) in VARIANTS {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated;
                let full_name = format!("{name} {variant}");
                let description = format!("{family} gear: {name}, {variant} edition");

                // Retail $9.99 - $89.99 plus the variant addon, wholesale
                // at 55-75% of retail, stock 0-60.
                let retail = 999 + ((seed * 37) % 8000) as i64 + price_addon;
                let wholesale = retail * (55 + (seed % 20) as i64) / 100;
                let quantity = (seed % 61) as i64;

                if let Err(e) = db
                    .products()
                    .create(&full_name, Some(&description), retail, wholesale, quantity)
                    .await
                {
                    eprintln!("Failed to insert {full_name}: {e}");
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let available = db.products().list_available(10).await?;
    println!("  Sample of catalog: {} products with stock", available.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
