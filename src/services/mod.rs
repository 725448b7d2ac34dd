// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services own the business rules: they validate, call repositories and
// emit events. Everything they return is an AppResult.

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod notification_service;
pub mod order_service;
pub mod wishlist_service;

// Re-export all services and their types
pub use auth_service::{AuthService, RegisterRequest};

pub use cart_service::{AddToCartRequest, CartService};

pub use catalog_service::CatalogService;

pub use checkout_service::CheckoutService;

pub use notification_service::NotificationService;

pub use order_service::{OrderDetails, OrderService};

pub use wishlist_service::WishlistService;
