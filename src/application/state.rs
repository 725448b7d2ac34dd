// src/application/state.rs

use std::sync::Arc;

use chrono::Duration;

use crate::config::StoreConfig;
use crate::db::{create_connection_pool, get_connection, initialize_database, ConnectionPool};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::repositories::*;
use crate::services::*;

/// The wired object graph shared by every view model.
/// All fields are Arc-wrapped so view models can hold clones.
#[derive(Clone)]
pub struct AppState {
    pub config: StoreConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub catalog_service: Arc<CatalogService>,
    pub auth_service: Arc<AuthService>,
    pub cart_service: Arc<CartService>,
    pub wishlist_service: Arc<WishlistService>,
    pub checkout_service: Arc<CheckoutService>,
    pub order_service: Arc<OrderService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Open (or create) the configured database, migrate it and wire services.
    pub fn initialize(config: &StoreConfig) -> AppResult<Self> {
        let pool = Arc::new(create_connection_pool(config)?);

        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }

        Ok(Self::from_pool(pool, config.clone()))
    }

    /// Wire services over an already migrated pool
    pub fn from_pool(pool: Arc<ConnectionPool>, config: StoreConfig) -> Self {
        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::new());

        // 2. REPOSITORIES
        let product_repo: Arc<dyn ProductRepository> = Arc::new(SqliteProductRepository::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let cart_repo: Arc<dyn CartRepository> = Arc::new(SqliteCartRepository::new(pool.clone()));
        let wishlist_repo: Arc<dyn WishlistRepository> = Arc::new(SqliteWishlistRepository::new(pool.clone()));
        let order_repo: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(pool.clone()));
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(pool.clone()));

        // 3. SERVICES
        let catalog_service = Arc::new(CatalogService::new(product_repo.clone()));
        let auth_service = Arc::new(AuthService::new(
            user_repo,
            event_bus.clone(),
            Duration::hours(config.session_ttl_hours),
        ));
        let cart_service = Arc::new(CartService::new(
            cart_repo.clone(),
            product_repo.clone(),
            event_bus.clone(),
            config.shipping,
        ));
        let wishlist_service = Arc::new(WishlistService::new(
            wishlist_repo,
            product_repo,
            cart_service.clone(),
            event_bus.clone(),
        ));
        let checkout_service = Arc::new(CheckoutService::new(
            cart_repo,
            order_repo.clone(),
            event_bus.clone(),
            config.shipping,
        ));
        let order_service = Arc::new(OrderService::new(order_repo, event_bus.clone()));
        let notification_service = Arc::new(NotificationService::new(
            notification_repo,
            event_bus.clone(),
            Duration::days(config.notification_retention_days),
        ));

        // 4. EVENT HANDLER REGISTRATION (WIRING)
        notification_service.register_event_handlers();

        Self {
            config,
            pool,
            event_bus,
            catalog_service,
            auth_service,
            cart_service,
            wishlist_service,
            checkout_service,
            order_service,
            notification_service,
        }
    }
}
