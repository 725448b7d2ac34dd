use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// A sellable catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Internal immutable identifier
    pub id: Uuid,

    pub name: String,

    pub description: String,

    pub category: ProductCategory,

    pub brand: String,

    /// List price in cents
    pub price_cents: i64,

    /// Percentage taken off the list price (0..=90)
    pub discount_percent: u8,

    pub image_url: Option<String>,

    /// Offered sizes. Empty means the product has a single size.
    pub sizes: Vec<String>,

    /// Offered colors. Empty means there is no color choice.
    pub colors: Vec<String>,

    /// Average review score (0.0..=5.0)
    pub rating: f32,

    /// Units available for sale
    pub stock: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Top-level catalog section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Men,
    Women,
    Kids,
    Accessories,
    Footwear,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Men,
        ProductCategory::Women,
        ProductCategory::Kids,
        ProductCategory::Accessories,
        ProductCategory::Footwear,
    ];
}

impl Product {
    pub fn new(name: String, category: ProductCategory, price_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            category,
            brand: String::new(),
            price_cents,
            discount_percent: 0,
            image_url: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            rating: 0.0,
            stock: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Price after discount, rounded down to the cent
    pub fn effective_price_cents(&self) -> i64 {
        self.price_cents * (100 - i64::from(self.discount_percent)) / 100
    }

    pub fn offers_size(&self, size: &str) -> bool {
        if self.sizes.is_empty() {
            size.is_empty()
        } else {
            self.sizes.iter().any(|s| s == size)
        }
    }

    pub fn offers_color(&self, color: &str) -> bool {
        self.stored_color(color).is_some()
    }

    /// The catalogue's own spelling of a colour, matched case-insensitively
    pub fn stored_color(&self, color: &str) -> Option<&str> {
        if self.colors.is_empty() {
            return color.is_empty().then_some("");
        }
        self.colors
            .iter()
            .find(|c| c.eq_ignore_ascii_case(color))
            .map(String::as_str)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Set stock and bump the modification timestamp
    pub fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductCategory::Men => write!(f, "men"),
            ProductCategory::Women => write!(f, "women"),
            ProductCategory::Kids => write!(f, "kids"),
            ProductCategory::Accessories => write!(f, "accessories"),
            ProductCategory::Footwear => write!(f, "footwear"),
        }
    }
}

impl FromStr for ProductCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "men" => Ok(ProductCategory::Men),
            "women" => Ok(ProductCategory::Women),
            "kids" => Ok(ProductCategory::Kids),
            "accessories" => Ok(ProductCategory::Accessories),
            "footwear" => Ok(ProductCategory::Footwear),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown product category '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_rounds_down() {
        let mut product = Product::new("Tee".to_string(), ProductCategory::Men, 1999);
        assert_eq!(product.effective_price_cents(), 1999);

        product.discount_percent = 15;
        // 1999 * 85 / 100 = 1699.15
        assert_eq!(product.effective_price_cents(), 1699);
    }

    #[test]
    fn test_single_size_product_only_accepts_empty_size() {
        let product = Product::new("Cap".to_string(), ProductCategory::Accessories, 900);
        assert!(product.offers_size(""));
        assert!(!product.offers_size("M"));
    }

    #[test]
    fn test_color_match_is_case_insensitive() {
        let mut product = Product::new("Sneaker".to_string(), ProductCategory::Footwear, 5900);
        product.colors = vec!["Black".to_string(), "White".to_string()];
        assert!(product.offers_color("black"));
        assert!(!product.offers_color("Red"));
        assert!(!product.offers_color(""));
        assert_eq!(product.stored_color("BLACK"), Some("Black"));
        assert_eq!(product.stored_color("Red"), None);
    }

    #[test]
    fn test_category_round_trips_through_text() {
        for category in ProductCategory::ALL {
            assert_eq!(category.to_string().parse::<ProductCategory>().unwrap(), category);
        }
        assert!("garden".parse::<ProductCategory>().is_err());
    }
}
