// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)
// - Money leaves the crate as integer cents plus a display string

use serde::{Deserialize, Serialize};

use crate::domain::{
    CartLine, CartSummary, Notification, Order, OrderItem, OrderTracking, Product, TrackingStage,
    User,
};
use crate::services::OrderDetails;

/// "USD 12.50" style display string for an amount in cents
pub fn format_money(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{} {}{}.{:02}", currency, sign, abs / 100, abs % 100)
}

// ============================================================================
// CATALOG DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price_cents: i64,
    pub price: String,
    /// Price after discount, equal to `price` when there is none
    pub sale_price: String,
    pub discount_percent: u8,
    pub image_url: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub rating: f32,
    pub in_stock: bool,
}

impl ProductDto {
    pub fn new(product: Product, currency: &str) -> Self {
        Self {
            id: product.id.to_string(),
            price: format_money(product.price_cents, currency),
            sale_price: format_money(product.effective_price_cents(), currency),
            in_stock: product.is_in_stock(),
            name: product.name,
            description: product.description,
            category: product.category.to_string(),
            brand: product.brand,
            price_cents: product.price_cents,
            discount_percent: product.discount_percent,
            image_url: product.image_url,
            sizes: product.sizes,
            colors: product.colors,
            rating: product.rating,
        }
    }
}

// ============================================================================
// CART DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineDto {
    pub item_id: String,
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl CartLineDto {
    pub fn new(line: CartLine, currency: &str) -> Self {
        Self {
            item_id: line.item.id.to_string(),
            product_id: line.item.product_id.to_string(),
            unit_price: format_money(line.unit_price_cents, currency),
            line_total: format_money(line.line_total_cents(), currency),
            product_name: line.product_name,
            image_url: line.image_url,
            size: line.item.size,
            color: line.item.color,
            quantity: line.item.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummaryDto {
    pub lines: Vec<CartLineDto>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub total_cents: i64,
}

impl CartSummaryDto {
    pub fn new(summary: CartSummary, currency: &str) -> Self {
        Self {
            item_count: summary.item_count,
            subtotal: format_money(summary.subtotal_cents, currency),
            shipping: format_money(summary.shipping_cents, currency),
            total: format_money(summary.total_cents, currency),
            total_cents: summary.total_cents,
            lines: summary
                .lines
                .into_iter()
                .map(|line| CartLineDto::new(line, currency))
                .collect(),
        }
    }
}

// ============================================================================
// ORDER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: String,
    pub status: String,
    pub placed_at: String,
    pub ship_to: String,
    pub payment: String,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    /// Header-only view, as shown in the order list
    pub fn new(order: Order, currency: &str) -> Self {
        Self::with_items(order, Vec::new(), currency)
    }

    pub fn from_details(details: OrderDetails, currency: &str) -> Self {
        Self::with_items(details.order, details.items, currency)
    }

    fn with_items(order: Order, items: Vec<OrderItem>, currency: &str) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.to_string(),
            placed_at: order.placed_at.to_rfc3339(),
            ship_to: format!("{}, {}", order.address.full_name, order.address.city),
            payment: order.payment.label(),
            subtotal: format_money(order.subtotal_cents, currency),
            shipping: format_money(order.shipping_cents, currency),
            total: format_money(order.total_cents, currency),
            items: items
                .into_iter()
                .map(|item| OrderItemDto {
                    product_id: item.product_id.to_string(),
                    unit_price: format_money(item.unit_price_cents, currency),
                    product_name: item.product_name,
                    size: item.size,
                    color: item.color,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ============================================================================
// TRACKING DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingStageDto {
    pub label: String,
    pub reached: bool,
    pub reached_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTrackingDto {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub stages: Vec<TrackingStageDto>,
    pub is_delivered: bool,
    pub is_cancelled: bool,
    pub current_status: String,
}

// ============================================================================
// ACCOUNT & INBOX DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub member_since: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDto {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub order_id: Option<String>,
    pub read: bool,
    pub created_at: String,
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<TrackingStage> for TrackingStageDto {
    fn from(stage: TrackingStage) -> Self {
        Self {
            reached: stage.is_reached(),
            reached_at: stage.reached_at.map(|d| d.to_rfc3339()),
            label: stage.label,
        }
    }
}

impl From<OrderTracking> for OrderTrackingDto {
    fn from(tracking: OrderTracking) -> Self {
        Self {
            order_id: tracking.order_id.to_string(),
            product_id: tracking.product_id.to_string(),
            product_name: tracking.product_name,
            image_url: tracking.image_url,
            size: tracking.size,
            color: tracking.color,
            quantity: tracking.quantity,
            stages: tracking.stages.into_iter().map(TrackingStageDto::from).collect(),
            is_delivered: tracking.is_delivered,
            is_cancelled: tracking.is_cancelled,
            current_status: tracking.current_status.to_string(),
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            member_since: user.created_at.to_rfc3339(),
        }
    }
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.to_string(),
            title: notification.title,
            body: notification.body,
            order_id: notification.order_id.map(|id| id.to_string()),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_tracking, ProductCategory, TrackingRow};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1299, "USD"), "USD 12.99");
        assert_eq!(format_money(5, "EUR"), "EUR 0.05");
        assert_eq!(format_money(-250, "USD"), "USD -2.50");
    }

    #[test]
    fn test_product_dto_prices() {
        let mut product = Product::new("Parka".to_string(), ProductCategory::Women, 12000);
        product.discount_percent = 25;

        let dto = ProductDto::new(product, "USD");
        assert_eq!(dto.price, "USD 120.00");
        assert_eq!(dto.sale_price, "USD 90.00");
        assert!(!dto.in_stock);
        assert_eq!(dto.category, "women");
    }

    #[test]
    fn test_tracking_dto_marks_reached_stages() {
        let row = TrackingRow {
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Parka".to_string(),
            image_url: None,
            size: "S".to_string(),
            color: "Olive".to_string(),
            quantity: 1,
            status: "placed".to_string(),
            recorded_at: Utc::now(),
        };

        let dto = OrderTrackingDto::from(build_tracking(vec![row]).remove(0));
        let reached: Vec<bool> = dto.stages.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, false, false, false]);
        assert_eq!(dto.stages[0].label, "Order Placed");
        assert_eq!(dto.current_status, "placed");
    }
}
