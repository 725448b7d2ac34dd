// src/application/seed.rs
//
// Demo catalog for fresh installs and the CLI.
//
// Product ids are UUIDv5 of the product name, so seeding twice finds the
// existing rows and leaves their stock alone.

use uuid::Uuid;

use crate::domain::{Product, ProductCategory};
use crate::error::AppResult;
use crate::services::CatalogService;

const SEED_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_52d4_8a3e_4b7f_9c21_3e5a_7d90_b812);

struct SeedProduct {
    name: &'static str,
    brand: &'static str,
    category: ProductCategory,
    price_cents: i64,
    discount_percent: u8,
    sizes: &'static [&'static str],
    colors: &'static [&'static str],
    rating: f32,
    stock: u32,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Classic Oxford Shirt",
        brand: "Harbor",
        category: ProductCategory::Men,
        price_cents: 4500,
        discount_percent: 0,
        sizes: &["S", "M", "L", "XL"],
        colors: &["White", "Blue"],
        rating: 4.5,
        stock: 40,
    },
    SeedProduct {
        name: "Slim Chino Trousers",
        brand: "Harbor",
        category: ProductCategory::Men,
        price_cents: 5900,
        discount_percent: 20,
        sizes: &["30", "32", "34", "36"],
        colors: &["Khaki", "Navy"],
        rating: 4.2,
        stock: 25,
    },
    SeedProduct {
        name: "Wrap Midi Dress",
        brand: "Lune",
        category: ProductCategory::Women,
        price_cents: 7800,
        discount_percent: 15,
        sizes: &["XS", "S", "M", "L"],
        colors: &["Emerald", "Black"],
        rating: 4.7,
        stock: 18,
    },
    SeedProduct {
        name: "Cropped Denim Jacket",
        brand: "Lune",
        category: ProductCategory::Women,
        price_cents: 6900,
        discount_percent: 0,
        sizes: &["S", "M", "L"],
        colors: &["Light Wash"],
        rating: 4.1,
        stock: 12,
    },
    SeedProduct {
        name: "Dino Print Hoodie",
        brand: "Little Steps",
        category: ProductCategory::Kids,
        price_cents: 2900,
        discount_percent: 10,
        sizes: &["4Y", "6Y", "8Y"],
        colors: &["Green", "Yellow"],
        rating: 4.8,
        stock: 30,
    },
    SeedProduct {
        name: "Canvas Tote Bag",
        brand: "Fieldwork",
        category: ProductCategory::Accessories,
        price_cents: 2200,
        discount_percent: 0,
        sizes: &[],
        colors: &["Natural", "Black"],
        rating: 4.4,
        stock: 60,
    },
    SeedProduct {
        name: "Leather Card Holder",
        brand: "Fieldwork",
        category: ProductCategory::Accessories,
        price_cents: 3500,
        discount_percent: 0,
        sizes: &[],
        colors: &[],
        rating: 4.6,
        stock: 35,
    },
    SeedProduct {
        name: "Trail Running Shoes",
        brand: "Stride",
        category: ProductCategory::Footwear,
        price_cents: 11000,
        discount_percent: 25,
        sizes: &["40", "41", "42", "43", "44"],
        colors: &["Grey", "Orange"],
        rating: 4.3,
        stock: 20,
    },
];

/// Insert any demo products that are missing. Returns how many were added.
pub fn seed_catalog(catalog: &CatalogService) -> AppResult<usize> {
    let mut inserted = 0;

    for seed in CATALOG {
        let id = Uuid::new_v5(&SEED_NAMESPACE, seed.name.as_bytes());
        if catalog.find_product(id)?.is_some() {
            continue;
        }

        let mut product = Product::new(seed.name.to_string(), seed.category, seed.price_cents);
        product.id = id;
        product.brand = seed.brand.to_string();
        product.description = format!("{} by {}", seed.name, seed.brand);
        product.discount_percent = seed.discount_percent;
        product.sizes = seed.sizes.iter().map(|s| s.to_string()).collect();
        product.colors = seed.colors.iter().map(|c| c.to_string()).collect();
        product.rating = seed.rating;
        product.stock = seed.stock;

        catalog.save_product(&product)?;
        inserted += 1;
    }

    log::info!("Seeded {} demo products", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;
    use crate::repositories::SqliteProductRepository;
    use std::sync::Arc;

    #[test]
    fn test_seed_is_idempotent() {
        let (_dir, pool) = test_pool();
        let catalog = CatalogService::new(Arc::new(SqliteProductRepository::new(pool)));

        assert_eq!(seed_catalog(&catalog).unwrap(), CATALOG.len());
        assert_eq!(seed_catalog(&catalog).unwrap(), 0);
        assert_eq!(catalog.list_products().unwrap().len(), CATALOG.len());
    }

    #[test]
    fn test_every_category_is_stocked() {
        for category in ProductCategory::ALL {
            assert!(CATALOG.iter().any(|p| p.category == category && p.stock > 0));
        }
    }
}
