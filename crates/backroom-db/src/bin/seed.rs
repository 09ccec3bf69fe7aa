//! # Seed Data Generator
//!
//! Populates the database with development data: a staff roster with
//! addresses, a product catalogue with warehouse stock, and a week of
//! scheduled tasks with assignments.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults (200 products)
//! cargo run -p backroom-db --bin seed
//!
//! # Custom catalogue size
//! cargo run -p backroom-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p backroom-db --bin seed -- --db ./data/backroom.db
//! ```

use chrono::{Datelike, NaiveDate, Utc};
use std::env;

use backroom_core::{Address, Employee, Money, Product, StockLevel, Task};
use backroom_db::{Database, DbConfig};

/// Staff roster: (first, last, position, monthly salary in cents).
const STAFF: &[(&str, &str, &str, i64)] = &[
    ("Jan", "Kowalski", "Manager", 750_000),
    ("Anna", "Nowak", "Cashier", 420_000),
    ("Piotr", "Wisniewski", "Cashier", 420_000),
    ("Maria", "Wojcik", "Stock Clerk", 400_000),
    ("Tomasz", "Kaminski", "Stock Clerk", 400_000),
    ("Ewa", "Lewandowska", "Cashier", 430_000),
    ("Marek", "Zielinski", "Security", 390_000),
    ("Katarzyna", "Szymanska", "Cashier", 420_000),
];

/// Catalogue categories with base product names.
const CATALOGUE: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Cola 330ml",
            "Mineral Water 1.5L",
            "Orange Juice 1L",
            "Apple Juice 1L",
            "Energy Drink 250ml",
            "Iced Tea 500ml",
            "Lemonade 1L",
            "Sparkling Water 500ml",
        ],
    ),
    (
        "SNK",
        &[
            "Potato Chips 150g",
            "Salted Pretzels 200g",
            "Chocolate Bar 100g",
            "Gummy Bears 250g",
            "Peanuts 300g",
            "Crackers 180g",
            "Biscuits 200g",
            "Popcorn 90g",
        ],
    ),
    (
        "DRY",
        &[
            "Whole Milk 1L",
            "Butter 200g",
            "Cheddar 300g",
            "Natural Yogurt 400g",
            "Cream 330ml",
            "Eggs 10pk",
            "Cottage Cheese 250g",
            "Kefir 1L",
        ],
    ),
    (
        "GRO",
        &[
            "Wheat Bread 500g",
            "Spaghetti 500g",
            "White Rice 1kg",
            "Canned Tomatoes 400g",
            "Sunflower Oil 1L",
            "Flour 1kg",
            "Sugar 1kg",
            "Honey 350g",
        ],
    ),
];

/// Warehouse zones for stock rows.
const LOCATIONS: &[&str] = &["A-01", "A-02", "B-01", "B-02", "C-01"];

/// Recurring shop-floor tasks, with duration in minutes.
const TASKS: &[(&str, i64)] = &[
    ("Morning shelf restock", 90),
    ("Till reconciliation", 45),
    ("Cold chain temperature check", 15),
    ("Backroom stocktake", 120),
    ("Delivery intake", 60),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./backroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Backroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./backroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Backroom Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    if !db.employees().list().await?.is_empty() {
        println!("⚠ Database already has employees");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Staff roster with addresses
    println!();
    println!("Seeding staff roster...");
    let mut employee_ids = Vec::with_capacity(STAFF.len());
    for (idx, (first, last, position, salary)) in STAFF.iter().enumerate() {
        let mut address = Address::new(
            format!("ul. Dluga {}", 10 + idx * 3),
            "Krakow",
            format!("30-{:03}", 100 + idx),
            "Poland",
        );
        db.addresses().insert(&mut address).await?;

        let email = format!(
            "{}.{}@backroom.example",
            first.to_lowercase(),
            last.to_lowercase()
        );
        let hired_on = NaiveDate::from_ymd_opt(2023, 1 + (idx as u32 % 12), 15)
            .ok_or("invalid hire date")?;
        let mut employee = Employee::new(
            *first,
            *last,
            email,
            *position,
            Money::from_cents(*salary),
            hired_on,
        )?;
        employee.address_id = Some(address.id);
        db.employees().insert(&mut employee).await?;
        employee_ids.push(employee.id);
    }
    println!("  {} employees with addresses", employee_ids.len());

    // Product catalogue with stock
    println!();
    println!("Seeding catalogue...");
    let mut generated = 0;
    'outer: for (category, names) in CATALOGUE {
        for (idx, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            // deterministic pseudo-random price: 0.99 - 19.99
            let price_cents = 99 + ((generated * 37) % 1900) as i64;
            let sku = format!("{}-{:03}", category, idx + 1);
            let mut product =
                Product::new(*name, Some(sku), Money::from_cents(price_cents))?;
            db.products().insert(&mut product).await?;

            let quantity = ((generated * 13) % 120) as i64;
            let location = LOCATIONS[generated % LOCATIONS.len()];
            let mut stock = StockLevel::new(product.id, quantity, location)?;
            db.stock().insert(&mut stock).await?;

            generated += 1;
        }
    }
    println!("  {} products with stock rows", generated);

    // A week of tasks, round-robin assigned
    println!();
    println!("Seeding task schedule...");
    let today = Utc::now().date_naive();
    let monday = today - chrono::Duration::days(today.weekday().num_days_from_monday() as i64);
    let mut assigned = 0;
    for day_offset in 0..7 {
        let day = monday + chrono::Duration::days(day_offset);
        for (idx, (name, minutes)) in TASKS.iter().enumerate() {
            let mut task = Task::new(*name, None, day, *minutes)?;
            db.tasks().insert(&mut task).await?;

            let who = employee_ids[(day_offset as usize + idx) % employee_ids.len()];
            db.tasks().assign(task.id, who).await?;
            assigned += 1;
        }
    }
    println!("  {} tasks assigned across the week", assigned);

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seed complete in {:?}", elapsed);

    // Quick sanity probe of the finders
    let hits = db.products().search("water").await?;
    println!("  Search 'water': {} results", hits.len());
    let workload = db
        .employees()
        .workload(monday, monday + chrono::Duration::days(6))
        .await?;
    println!("  Workload rows this week: {}", workload.len());

    db.close().await;
    Ok(())
}
