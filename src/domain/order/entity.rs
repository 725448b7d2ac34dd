use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::address::ShippingAddress;
use crate::domain::payment::PaymentMethod;
use crate::domain::DomainError;

/// A placed order. Money fields are frozen at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub address: ShippingAddress,
    pub payment: PaymentMethod,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub placed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One purchased line, with name and unit price copied from the product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

/// Order lifecycle. Progression is strictly linear up to Delivered;
/// Cancelled is reachable only before shipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl Order {
    pub fn new(
        user_id: Uuid,
        address: ShippingAddress,
        payment: PaymentMethod,
        subtotal_cents: i64,
        shipping_cents: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::Placed,
            address,
            payment,
            subtotal_cents,
            shipping_cents,
            total_cents: subtotal_cents + shipping_cents,
            placed_at: now,
            updated_at: now,
        }
    }
}

impl OrderItem {
    pub fn new(
        order_id: Uuid,
        product_id: Uuid,
        product_name: String,
        size: String,
        color: String,
        quantity: u32,
        unit_price_cents: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            product_name,
            size,
            color,
            quantity,
            unit_price_cents,
        }
    }

    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Next stage in the delivery progression, if any
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_cancellable(self) -> bool {
        matches!(self, OrderStatus::Placed | OrderStatus::Confirmed)
    }

    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_final() {
            return false;
        }
        if target == OrderStatus::Cancelled {
            return self.is_cancellable();
        }
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(OrderStatus::Placed),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}
