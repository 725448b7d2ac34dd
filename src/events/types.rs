// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::OrderStatus;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// ACCOUNT EVENTS
// ============================================================================

/// Emitted when a new account is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub email: String,
}

impl UserRegistered {
    pub fn new(user_id: Uuid, email: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            email,
        }
    }
}

impl DomainEvent for UserRegistered {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserRegistered" }
}

/// Emitted when a session is opened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: Uuid,
}

impl UserLoggedIn {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
        }
    }
}

impl DomainEvent for UserLoggedIn {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserLoggedIn" }
}

// ============================================================================
// CART & WISHLIST EVENTS
// ============================================================================

/// Emitted after any change to a user's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub item_count: u32,
}

impl CartUpdated {
    pub fn new(user_id: Uuid, item_count: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            item_count,
        }
    }
}

impl DomainEvent for CartUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CartUpdated" }
}

/// Emitted when a product is added to or removed from a wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub added: bool,
}

impl WishlistChanged {
    pub fn new(user_id: Uuid, product_id: Uuid, added: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            product_id,
            added,
        }
    }
}

impl DomainEvent for WishlistChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "WishlistChanged" }
}

// ============================================================================
// ORDER EVENTS
// ============================================================================

/// Emitted once an order and its items are committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub total_cents: i64,
    pub item_count: u32,
}

impl OrderPlaced {
    pub fn new(order_id: Uuid, user_id: Uuid, total_cents: i64, item_count: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id,
            user_id,
            total_cents,
            item_count,
        }
    }
}

impl DomainEvent for OrderPlaced {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "OrderPlaced" }
}

/// Emitted when an order advances to the next delivery stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatusChanged {
    pub fn new(order_id: Uuid, user_id: Uuid, from: OrderStatus, to: OrderStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id,
            user_id,
            from,
            to,
        }
    }
}

impl DomainEvent for OrderStatusChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "OrderStatusChanged" }
}

/// Emitted when an order is cancelled and its stock returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub user_id: Uuid,
}

impl OrderCancelled {
    pub fn new(order_id: Uuid, user_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            order_id,
            user_id,
        }
    }
}

impl DomainEvent for OrderCancelled {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "OrderCancelled" }
}

// ============================================================================
// NOTIFICATION EVENTS
// ============================================================================

/// Emitted when a notification lands in a user's inbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub notification_id: Uuid,
    pub user_id: Uuid,
}

impl NotificationCreated {
    pub fn new(notification_id: Uuid, user_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            notification_id,
            user_id,
        }
    }
}

impl DomainEvent for NotificationCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "NotificationCreated" }
}
