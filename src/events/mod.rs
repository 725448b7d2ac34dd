// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Cart & wishlist
    CartUpdated,
    // Notifications
    NotificationCreated,
    // Orders
    OrderCancelled,
    OrderPlaced,
    OrderStatusChanged,
    // Accounts
    UserLoggedIn,
    UserRegistered,
    WishlistChanged,
};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
