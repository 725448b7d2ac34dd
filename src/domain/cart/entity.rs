use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ShippingRules;

/// One product/size/color combination in a user's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,

    /// Empty when the product has a single size
    pub size: String,

    /// Empty when the product has no color choice
    pub color: String,

    pub quantity: u32,

    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(user_id: Uuid, product_id: Uuid, size: String, color: String, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            size,
            color,
            quantity,
            added_at: Utc::now(),
        }
    }
}

/// Cart item joined with the product data needed to display and price it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CartItem,
    pub product_name: String,
    pub image_url: Option<String>,

    /// Discounted unit price at the time the cart is read
    pub unit_price_cents: i64,

    /// Units currently available for the product
    pub stock: u32,
}

impl CartLine {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.item.quantity)
    }
}

/// Priced view of a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
}

impl CartSummary {
    pub fn from_lines(lines: Vec<CartLine>, shipping: &ShippingRules) -> Self {
        let item_count = lines.iter().map(|l| l.item.quantity).sum();
        let subtotal_cents: i64 = lines.iter().map(CartLine::line_total_cents).sum();
        let shipping_cents = shipping.shipping_for(subtotal_cents);

        Self {
            lines,
            item_count,
            subtotal_cents,
            shipping_cents,
            total_cents: subtotal_cents + shipping_cents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price_cents: i64, quantity: u32) -> CartLine {
        CartLine {
            item: CartItem::new(Uuid::new_v4(), Uuid::new_v4(), "M".to_string(), String::new(), quantity),
            product_name: "Tee".to_string(),
            image_url: None,
            unit_price_cents,
            stock: 10,
        }
    }

    #[test]
    fn test_summary_below_free_shipping() {
        let summary = CartSummary::from_lines(vec![line(1000, 2), line(450, 1)], &ShippingRules::default());

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal_cents, 2450);
        assert_eq!(summary.shipping_cents, 499);
        assert_eq!(summary.total_cents, 2949);
    }

    #[test]
    fn test_summary_free_shipping_threshold() {
        let summary = CartSummary::from_lines(vec![line(2500, 2)], &ShippingRules::default());
        assert_eq!(summary.shipping_cents, 0);
        assert_eq!(summary.total_cents, 5000);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::from_lines(Vec::new(), &ShippingRules::default());
        assert!(summary.is_empty());
        assert_eq!(summary.total_cents, 0);
    }
}
