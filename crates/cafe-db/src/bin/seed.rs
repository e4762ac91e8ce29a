//! # Seed Data Generator
//!
//! Sets up a demo cafe: menu, dining tables, stock room and settings.
//!
//! ## Usage
//! ```bash
//! # Seed ./cafe_dev.db with 8 tables
//! cargo run -p cafe-db --bin seed
//!
//! # More tables
//! cargo run -p cafe-db --bin seed -- --tables 12
//!
//! # Specify database path
//! cargo run -p cafe-db --bin seed -- --db ./data/cafe.db
//! ```
//!
//! ## Generated Data
//! - Menu categories with items priced in rupees; each item carries the
//!   GST slab of its category (5% food and drinks, 18% for the bar)
//! - Tables `T1`..`Tn`
//! - Staff: one account per role
//! - Stock-room ingredients with reorder points
//! - Cafe identity settings (name, address, GSTIN, footer)

use std::env;

use cafe_core::gst::GstCategory;
use cafe_core::settings::{
    CafeInfo, KEY_CAFE_ADDRESS, KEY_CAFE_NAME, KEY_GST_NUMBER, KEY_RECEIPT_FOOTER,
};
use cafe_core::UserRole;
use cafe_db::{
    Database, DbConfig, NewCategory, NewInventoryItem, NewMenuItem, NewSetting, NewTable, NewUser,
};

/// Menu sections: (name, GST slab, [(item, price in rupees)])
const MENU: &[(&str, GstCategory, &[(&str, i64)])] = &[
    (
        "Hot Beverages",
        GstCategory::FoodAndBeverages,
        &[
            ("Espresso", 120),
            ("Cappuccino", 160),
            ("Cafe Latte", 180),
            ("Masala Chai", 60),
            ("Filter Coffee", 70),
            ("Hot Chocolate", 190),
        ],
    ),
    (
        "Cold Beverages",
        GstCategory::FoodAndBeverages,
        &[
            ("Cold Coffee", 170),
            ("Iced Americano", 150),
            ("Fresh Lime Soda", 90),
            ("Mango Lassi", 110),
        ],
    ),
    (
        "Snacks",
        GstCategory::FoodAndBeverages,
        &[
            ("Veg Sandwich", 140),
            ("Paneer Puff", 60),
            ("Samosa", 30),
            ("French Fries", 120),
        ],
    ),
    (
        "Desserts",
        GstCategory::FoodAndBeverages,
        &[
            ("Chocolate Brownie", 130),
            ("Blueberry Cheesecake", 220),
            ("Butter Croissant", 110),
        ],
    ),
    (
        "Bar",
        GstCategory::Alcohol,
        &[("Craft Beer", 350), ("House Red Wine", 450)],
    ),
];

/// Staff: (name, username, role)
const STAFF: &[(&str, &str, UserRole)] = &[
    ("Anita Rao", "anita", UserRole::Admin),
    ("Vikram Shah", "vikram", UserRole::Manager),
    ("Priya Das", "priya", UserRole::Cashier),
    ("Sunil Mehta", "sunil", UserRole::Staff),
];

/// Stock room: (name, quantity, unit, reorder point, cost per unit in rupees)
const INVENTORY: &[(&str, f64, &str, f64, i64)] = &[
    ("Coffee Beans", 12.0, "kg", 3.0, 900),
    ("Whole Milk", 40.0, "l", 10.0, 60),
    ("Sugar", 15.0, "kg", 5.0, 45),
    ("Tea Leaves", 4.0, "kg", 1.0, 400),
    ("Paper Cups", 500.0, "pcs", 100.0, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut tables: usize = 8;
    let mut db_path = String::from("./cafe_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tables" | "-t" => {
                if i + 1 < args.len() {
                    tables = args[i + 1].parse().unwrap_or(8);
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
                println!("Cafe POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tables <N>   Number of dining tables (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: ./cafe_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cafe POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Tables:   {}", tables);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.menu().list_categories().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} menu categories", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Menu
    println!();
    println!("Creating menu...");
    let mut items = 0;
    for (category_name, slab, dishes) in MENU {
        let category = db
            .menu()
            .create_category(&NewCategory {
                name: category_name.to_string(),
                description: None,
            })
            .await?;

        for (dish, rupees) in dishes.iter() {
            let item = NewMenuItem {
                name: dish.to_string(),
                description: None,
                price_paise: rupees * 100,
                category_id: Some(category.id),
                tax_rate_bps: slab.default_rate().bps(),
                available: true,
                image_url: None,
                stock_quantity: 50,
            };
            if let Err(e) = db.menu().create_item(&item).await {
                eprintln!("Failed to insert {}: {}", dish, e);
                continue;
            }
            items += 1;
        }
    }
    println!("  {} categories, {} items", MENU.len(), items);

    // Floor
    for n in 1..=tables {
        db.tables()
            .create(&NewTable {
                name: format!("T{}", n),
                capacity: Some(if n % 3 == 0 { 6 } else { 4 }),
                occupied: false,
            })
            .await?;
    }
    println!("  {} tables", tables);

    // Staff
    for (name, username, role) in STAFF {
        db.users().create(&NewUser::new(*name, *username, *role)).await?;
    }
    println!("  {} staff accounts", STAFF.len());

    // Stock room
    for (name, quantity, unit, threshold, cost) in INVENTORY {
        db.inventory()
            .create(&NewInventoryItem {
                name: name.to_string(),
                quantity: *quantity,
                unit: unit.to_string(),
                alert_threshold: Some(*threshold),
                cost_paise: Some(cost * 100),
            })
            .await?;
    }
    println!("  {} inventory items", INVENTORY.len());

    // Identity
    let cafe = CafeInfo::default();
    for (key, value) in [
        (KEY_CAFE_NAME, &cafe.name),
        (KEY_CAFE_ADDRESS, &cafe.address),
        (KEY_GST_NUMBER, &cafe.gstin),
        (KEY_RECEIPT_FOOTER, &cafe.footer),
    ] {
        db.settings().upsert(&NewSetting::new(key, value.as_str())).await?;
    }
    println!("  cafe settings for {}", cafe.name);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
