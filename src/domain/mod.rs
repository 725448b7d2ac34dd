// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod address;
pub mod cart;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod tracking;
pub mod user;
pub mod wishlist;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog
pub use product::{validate_product, Product, ProductCategory};

// Accounts
pub use user::{validate_email, validate_password, validate_user, Session, User};

// Cart
pub use cart::{validate_quantity, CartItem, CartLine, CartSummary, MAX_LINE_QUANTITY};

// Wishlist
pub use wishlist::WishlistItem;

// Checkout
pub use address::{validate_address, ShippingAddress};
pub use payment::{validate_payment, PaymentMethod};

// Orders
pub use order::{validate_order, Order, OrderItem, OrderStatus};

// Order tracking (Derived Data)
pub use tracking::{build_tracking, OrderTracking, TrackingRow, TrackingStage, TRACKING_STAGES};

// Notifications
pub use notification::{validate_notification, Notification, NotificationKind};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: u32,
        available: u32,
    },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
