// src/repositories/mod.rs
//
// Repository layer (data-access objects)
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit, parameterized SQL only
//
// The one exception to "one table per repository" is OrderRepository:
// placing, advancing and cancelling an order touch several tables and
// must do so inside a single transaction.

mod mapping;

pub mod cart_repository;
pub mod notification_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;
pub mod wishlist_repository;

pub use cart_repository::{CartRepository, SqliteCartRepository};
pub use notification_repository::{NotificationRepository, SqliteNotificationRepository};
pub use order_repository::{OrderRepository, SqliteOrderRepository};
pub use product_repository::{ProductRepository, SqliteProductRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
pub use wishlist_repository::{SqliteWishlistRepository, WishlistRepository};

#[cfg(test)]
pub use cart_repository::MockCartRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use wishlist_repository::MockWishlistRepository;
