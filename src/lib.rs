// src/lib.rs
// Storefront - Local-first shop core: catalog, cart, checkout, orders,
// wishlist, notifications and accounts
//
// Architecture:
// - Domain-centric: business rules and invariants live in domain
// - Repositories: dumb data mappers over SQLite, explicit SQL only
// - Services: orchestration, validation and event emission
// - Event-driven: services coordinate through the event bus
// - Application layer: DTOs and observable view state for the UI
// - Local-first: everything is stored in one SQLite file

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{ShippingRules, StoreConfig};

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    build_tracking,
    validate_address,
    validate_email,
    validate_notification,
    validate_order,
    validate_password,
    validate_payment,
    validate_product,
    validate_quantity,
    validate_user,
    // Cart
    CartItem,
    CartLine,
    CartSummary,
    DomainError,
    DomainResult,
    // Notifications
    Notification,
    NotificationKind,
    // Orders
    Order,
    OrderItem,
    OrderStatus,
    // Tracking
    OrderTracking,
    PaymentMethod,
    // Catalog
    Product,
    ProductCategory,
    Session,
    ShippingAddress,
    TrackingRow,
    TrackingStage,
    // Accounts
    User,
    // Wishlist
    WishlistItem,
    MAX_LINE_QUANTITY,
    TRACKING_STAGES,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CartUpdated,
    DomainEvent,
    EventBus,
    EventLogEntry,
    NotificationCreated,
    OrderCancelled,
    OrderPlaced,
    OrderStatusChanged,
    UserLoggedIn,
    UserRegistered,
    WishlistChanged,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, create_connection_pool_at, get_database_stats, initialize_database,
    verify_database_integrity, ConnectionPool, DatabaseStats, SCHEMA_VERSION,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CartRepository,
    NotificationRepository,
    OrderRepository,
    ProductRepository,
    SqliteCartRepository,
    SqliteNotificationRepository,
    SqliteOrderRepository,
    SqliteProductRepository,
    SqliteUserRepository,
    SqliteWishlistRepository,
    UserRepository,
    WishlistRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AddToCartRequest,
    AuthService,
    CartService,
    CatalogService,
    CheckoutService,
    NotificationService,
    OrderDetails,
    OrderService,
    RegisterRequest,
    WishlistService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{seed_catalog, AppState, ErrorResponse, ErrorType, StateHolder, ViewState};

// Re-export application submodules
pub use application::dto;
pub use application::view_models;
