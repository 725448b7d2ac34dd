use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order::OrderStatus;

/// The four delivery stages shown to the shopper, in display order
pub const TRACKING_STAGES: [OrderStatus; 4] = [
    OrderStatus::Placed,
    OrderStatus::Confirmed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

/// Fixed shopper-facing label for a stage
pub fn stage_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Placed => "Order Placed",
        OrderStatus::Confirmed => "Order Confirmed",
        OrderStatus::Shipped => "Shipped",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

/// Raw row of the tracking query: one status change of one order line,
/// joined with the order item and product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRow {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,

    /// Stored status text, may be unknown to this build
    pub status: String,

    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingStage {
    pub status: OrderStatus,
    pub label: String,

    /// When the stage was reached, None while still pending
    pub reached_at: Option<DateTime<Utc>>,
}

impl TrackingStage {
    pub fn is_reached(&self) -> bool {
        self.reached_at.is_some()
    }
}

/// Derived tracking view of one order line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTracking {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,

    /// Always the four TRACKING_STAGES, in order
    pub stages: Vec<TrackingStage>,

    pub is_delivered: bool,
    pub is_cancelled: bool,
    pub current_status: OrderStatus,
}
