//! Seed Data
//!
//! The starter product set and the `seed` command that writes it out as a
//! catalog file.

use super::models::{CatalogError, Product};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use uuid::Uuid;

/// (name, description, price, image slug, category, in stock)
#[rustfmt::skip]
const SEED: &[(&str, &str, f64, &str, &str, bool)] = &[
    // Electronics
    ("Wireless Noise-Cancelling Headphones", "Over-ear headphones with active noise cancellation, Bluetooth 5.3 and a 30-hour battery.", 249.99, "headphones", "Electronics", true),
    ("Ultra-Slim Mechanical Keyboard", "Low-profile 75% keyboard with hot-swappable switches, RGB backlight and an aluminum frame.", 149.99, "keyboard", "Electronics", true),
    ("4K Webcam Pro", "Ultra HD webcam with auto-focus, a built-in ring light and a wide-angle lens for video calls.", 129.99, "webcam", "Electronics", true),
    ("Portable Bluetooth Speaker", "IP67 waterproof speaker with 360-degree sound and 20 hours of playback.", 79.99, "speaker", "Electronics", true),
    ("Smart Fitness Watch", "Fitness tracker with heart rate, GPS, sleep analysis and an always-on AMOLED display.", 199.99, "smartwatch", "Electronics", false),
    // Clothing
    ("Merino Wool Crew Neck Sweater", "Relaxed-fit sweater knitted from soft, temperature-regulating merino wool.", 89.99, "sweater", "Clothing", true),
    ("Slim Fit Chino Pants", "Stretch cotton chinos with a tapered leg for the office or the weekend.", 64.99, "chinos", "Clothing", true),
    ("Lightweight Down Jacket", "Packable, water-resistant jacket filled with responsibly sourced down.", 159.99, "jacket", "Clothing", true),
    ("Organic Cotton Graphic Tee", "Heavyweight organic cotton t-shirt with a screen-printed graphic.", 34.99, "tshirt", "Clothing", true),
    // Home & Kitchen
    ("Pour-Over Coffee Maker Set", "Glass carafe, stainless filter and gooseneck kettle for slow brewed coffee.", 54.99, "coffee", "Home & Kitchen", true),
    ("Cast Iron Dutch Oven", "Enameled 5.5 quart pot that moves from stovetop to oven.", 119.99, "dutchoven", "Home & Kitchen", true),
    ("Bamboo Cutting Board Set", "Three sustainable bamboo boards with juice grooves.", 39.99, "cuttingboard", "Home & Kitchen", true),
    ("Smart LED Desk Lamp", "Dimmable lamp with adjustable color temperature and a wireless charging base.", 69.99, "desklamp", "Home & Kitchen", true),
    ("Ceramic Plant Pot Collection", "Set of matte glazed pots with drainage holes and bamboo trays.", 44.99, "plantpots", "Home & Kitchen", false),
    // Accessories
    ("Leather Minimalist Wallet", "Slim full-grain leather card holder with RFID blocking.", 59.99, "wallet", "Accessories", true),
    ("Polarized Aviator Sunglasses", "Metal-frame aviators with polarized UV400 lenses.", 89.99, "sunglasses", "Accessories", true),
    ("Canvas Weekender Bag", "Waxed canvas duffel with leather trim and a shoe compartment.", 109.99, "weekender", "Accessories", true),
    ("Automatic Stainless Steel Watch", "Self-winding watch with a sapphire crystal and 100m water resistance.", 279.99, "watch", "Accessories", true),
    // Sports
    ("Non-Slip Yoga Mat", "Extra-thick natural rubber mat with alignment lines and a carry strap.", 68.99, "yogamat", "Sports", true),
    ("Adjustable Dumbbell Set", "Pair of dumbbells that adjust from 5 to 52.5 pounds with a dial.", 349.99, "dumbbells", "Sports", true),
    ("Insulated Water Bottle", "Double-wall stainless bottle that keeps drinks cold for 24 hours.", 34.99, "waterbottle", "Sports", true),
    ("Resistance Band Training Kit", "Five fabric bands of increasing tension with a travel pouch.", 29.99, "resistancebands", "Sports", true),
];

/// Builds the seed products.
///
/// Each product gets a fresh id; `created_at` increases by one second per
/// product so that newest-first ordering lists the seed in reverse.
pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    let count = SEED.len() as i64;
    SEED.iter()
        .enumerate()
        .map(|(i, &(name, description, price, slug, category, in_stock))| {
            let created_at = now - Duration::seconds(count - i as i64);
            Product {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price,
                image: format!("https://picsum.photos/seed/{}/800/800", slug),
                category: category.to_string(),
                in_stock,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

/// Replaces the catalog file at `path` with a fresh seed set.
///
/// Returns the number of products written.
pub fn write_seed(path: &Path) -> Result<usize, CatalogError> {
    tracing::info!("Seeding catalog...");

    let deleted = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<Vec<Product>>(&raw)
            .map(|old| old.len())
            .unwrap_or(0),
        Err(_) => 0,
    };
    tracing::info!("Deleted {} existing products.", deleted);

    let products = seed_products(Utc::now());
    for product in &products {
        tracing::info!("Created product: {}", product.name);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&products)?)?;

    tracing::info!("Seeded {} products successfully.", products.len());
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogStore, InMemoryCatalog, ProductQuery};

    #[test]
    fn test_seed_products_are_unique_and_ordered() {
        let products = seed_products(Utc::now());
        assert_eq!(products.len(), 22);

        let mut ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 22);

        assert!(products.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert!(products.iter().all(|p| p.price >= 0.0));
    }

    #[tokio::test]
    async fn test_write_seed_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        assert_eq!(write_seed(&path).unwrap(), 22);
        let first = InMemoryCatalog::from_path(&path).unwrap();

        assert_eq!(write_seed(&path).unwrap(), 22);
        let second = InMemoryCatalog::from_path(&path).unwrap();
        assert_eq!(second.len(), 22);

        let categories = second.categories().await.unwrap();
        assert_eq!(
            categories,
            vec!["Accessories", "Clothing", "Electronics", "Home & Kitchen", "Sports"]
        );

        let old = first.search(&ProductQuery::default()).await.unwrap();
        assert!(second.find(&old[0].id).await.unwrap().is_none());
    }
}
