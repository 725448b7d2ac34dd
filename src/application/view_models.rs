// src/application/view_models.rs
//
// View-state holders, one per screen family.
//
// Each method proxies a service call through a StateHolder and converts
// the result to DTOs. Branching is limited to success vs failure, which
// StateHolder::run already does.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::application::dto::{
    CartSummaryDto, NotificationDto, OrderDto, OrderTrackingDto, ProductDto, UserDto,
};
use crate::application::state::AppState;
use crate::application::view_state::{StateHolder, ViewState};
use crate::domain::{PaymentMethod, ProductCategory, Session, ShippingAddress};
use crate::services::*;

// ============================================================================
// CATALOG
// ============================================================================

pub struct CatalogViewModel {
    catalog: Arc<CatalogService>,
    currency: String,
    pub products: StateHolder<Vec<ProductDto>>,
    pub product: StateHolder<ProductDto>,
}

impl CatalogViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            catalog: state.catalog_service.clone(),
            currency: state.config.currency.clone(),
            products: StateHolder::new(),
            product: StateHolder::new(),
        }
    }

    pub fn products_stream(&self) -> watch::Receiver<ViewState<Vec<ProductDto>>> {
        self.products.subscribe()
    }

    pub async fn load_all(&self) -> ViewState<Vec<ProductDto>> {
        let (catalog, currency) = (self.catalog.clone(), self.currency.clone());
        self.products
            .run(move || Ok(to_product_dtos(catalog.list_products()?, &currency)))
            .await
    }

    pub async fn load_category(&self, category: ProductCategory) -> ViewState<Vec<ProductDto>> {
        let (catalog, currency) = (self.catalog.clone(), self.currency.clone());
        self.products
            .run(move || Ok(to_product_dtos(catalog.products_in_category(category)?, &currency)))
            .await
    }

    pub async fn search(&self, query: String) -> ViewState<Vec<ProductDto>> {
        let (catalog, currency) = (self.catalog.clone(), self.currency.clone());
        self.products
            .run(move || Ok(to_product_dtos(catalog.search(&query)?, &currency)))
            .await
    }

    pub async fn load_top_rated(&self, limit: u32) -> ViewState<Vec<ProductDto>> {
        let (catalog, currency) = (self.catalog.clone(), self.currency.clone());
        self.products
            .run(move || Ok(to_product_dtos(catalog.top_rated(limit)?, &currency)))
            .await
    }

    pub async fn load_product(&self, product_id: Uuid) -> ViewState<ProductDto> {
        let (catalog, currency) = (self.catalog.clone(), self.currency.clone());
        self.product
            .run(move || Ok(ProductDto::new(catalog.get_product(product_id)?, &currency)))
            .await
    }
}

// ============================================================================
// AUTH
// ============================================================================

pub struct AuthViewModel {
    auth: Arc<AuthService>,
    pub user: StateHolder<UserDto>,
    pub session: StateHolder<Session>,
    pub signed_out: StateHolder<()>,
}

impl AuthViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth_service.clone(),
            user: StateHolder::new(),
            session: StateHolder::new(),
            signed_out: StateHolder::new(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> ViewState<UserDto> {
        let auth = self.auth.clone();
        self.user
            .run(move || Ok(UserDto::from(auth.register(request)?)))
            .await
    }

    pub async fn login(&self, email: String, password: String) -> ViewState<Session> {
        let auth = self.auth.clone();
        self.session.run(move || auth.login(&email, &password)).await
    }

    pub async fn load_current_user(&self, token: String) -> ViewState<UserDto> {
        let auth = self.auth.clone();
        self.user
            .run(move || Ok(UserDto::from(auth.current_user(&token)?)))
            .await
    }

    pub async fn logout(&self, token: String) -> ViewState<()> {
        let auth = self.auth.clone();
        let state = self.signed_out.run(move || auth.logout(&token)).await;
        self.session.reset();
        self.user.reset();
        state
    }
}

// ============================================================================
// CART
// ============================================================================

pub struct CartViewModel {
    cart: Arc<CartService>,
    currency: String,
    pub summary: StateHolder<CartSummaryDto>,
}

impl CartViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            cart: state.cart_service.clone(),
            currency: state.config.currency.clone(),
            summary: StateHolder::new(),
        }
    }

    pub fn summary_stream(&self) -> watch::Receiver<ViewState<CartSummaryDto>> {
        self.summary.subscribe()
    }

    pub async fn load(&self, user_id: Uuid) -> ViewState<CartSummaryDto> {
        let (cart, currency) = (self.cart.clone(), self.currency.clone());
        self.summary
            .run(move || Ok(CartSummaryDto::new(cart.summary(user_id)?, &currency)))
            .await
    }

    pub async fn add(&self, request: AddToCartRequest) -> ViewState<CartSummaryDto> {
        let (cart, currency) = (self.cart.clone(), self.currency.clone());
        self.summary
            .run(move || {
                let user_id = request.user_id;
                cart.add_item(request)?;
                Ok(CartSummaryDto::new(cart.summary(user_id)?, &currency))
            })
            .await
    }

    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: u32,
    ) -> ViewState<CartSummaryDto> {
        let (cart, currency) = (self.cart.clone(), self.currency.clone());
        self.summary
            .run(move || {
                cart.update_quantity(item_id, quantity)?;
                Ok(CartSummaryDto::new(cart.summary(user_id)?, &currency))
            })
            .await
    }

    pub async fn remove(&self, user_id: Uuid, item_id: Uuid) -> ViewState<CartSummaryDto> {
        let (cart, currency) = (self.cart.clone(), self.currency.clone());
        self.summary
            .run(move || {
                cart.remove_item(item_id)?;
                Ok(CartSummaryDto::new(cart.summary(user_id)?, &currency))
            })
            .await
    }

    pub async fn clear(&self, user_id: Uuid) -> ViewState<CartSummaryDto> {
        let (cart, currency) = (self.cart.clone(), self.currency.clone());
        self.summary
            .run(move || {
                cart.clear(user_id)?;
                Ok(CartSummaryDto::new(cart.summary(user_id)?, &currency))
            })
            .await
    }
}

// ============================================================================
// WISHLIST
// ============================================================================

pub struct WishlistViewModel {
    wishlist: Arc<WishlistService>,
    currency: String,
    pub items: StateHolder<Vec<ProductDto>>,
}

impl WishlistViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            wishlist: state.wishlist_service.clone(),
            currency: state.config.currency.clone(),
            items: StateHolder::new(),
        }
    }

    pub async fn load(&self, user_id: Uuid) -> ViewState<Vec<ProductDto>> {
        let (wishlist, currency) = (self.wishlist.clone(), self.currency.clone());
        self.items
            .run(move || Ok(to_product_dtos(wishlist.list(user_id)?, &currency)))
            .await
    }

    pub async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> ViewState<Vec<ProductDto>> {
        let (wishlist, currency) = (self.wishlist.clone(), self.currency.clone());
        self.items
            .run(move || {
                wishlist.toggle(user_id, product_id)?;
                Ok(to_product_dtos(wishlist.list(user_id)?, &currency))
            })
            .await
    }

    pub async fn move_to_cart(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        size: String,
        color: String,
    ) -> ViewState<Vec<ProductDto>> {
        let (wishlist, currency) = (self.wishlist.clone(), self.currency.clone());
        self.items
            .run(move || {
                wishlist.move_to_cart(user_id, product_id, size, color)?;
                Ok(to_product_dtos(wishlist.list(user_id)?, &currency))
            })
            .await
    }
}

// ============================================================================
// CHECKOUT
// ============================================================================

pub struct CheckoutViewModel {
    checkout: Arc<CheckoutService>,
    currency: String,
    pub preview: StateHolder<CartSummaryDto>,
    pub placed_order: StateHolder<OrderDto>,
}

impl CheckoutViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            checkout: state.checkout_service.clone(),
            currency: state.config.currency.clone(),
            preview: StateHolder::new(),
            placed_order: StateHolder::new(),
        }
    }

    pub async fn load_preview(&self, user_id: Uuid) -> ViewState<CartSummaryDto> {
        let (checkout, currency) = (self.checkout.clone(), self.currency.clone());
        self.preview
            .run(move || Ok(CartSummaryDto::new(checkout.preview(user_id)?, &currency)))
            .await
    }

    pub async fn place_order(
        &self,
        user_id: Uuid,
        address: ShippingAddress,
        payment: PaymentMethod,
    ) -> ViewState<OrderDto> {
        let (checkout, currency) = (self.checkout.clone(), self.currency.clone());
        self.placed_order
            .run(move || Ok(OrderDto::new(checkout.place_order(user_id, address, payment)?, &currency)))
            .await
    }
}

// ============================================================================
// ORDERS & TRACKING
// ============================================================================

pub struct OrdersViewModel {
    orders: Arc<OrderService>,
    currency: String,
    pub order_list: StateHolder<Vec<OrderDto>>,
    pub order_detail: StateHolder<OrderDto>,
    pub tracking: StateHolder<Vec<OrderTrackingDto>>,
}

impl OrdersViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.order_service.clone(),
            currency: state.config.currency.clone(),
            order_list: StateHolder::new(),
            order_detail: StateHolder::new(),
            tracking: StateHolder::new(),
        }
    }

    pub fn tracking_stream(&self) -> watch::Receiver<ViewState<Vec<OrderTrackingDto>>> {
        self.tracking.subscribe()
    }

    pub async fn load_orders(&self, user_id: Uuid) -> ViewState<Vec<OrderDto>> {
        let (orders, currency) = (self.orders.clone(), self.currency.clone());
        self.order_list
            .run(move || {
                Ok(orders
                    .list_orders(user_id)?
                    .into_iter()
                    .map(|order| OrderDto::new(order, &currency))
                    .collect())
            })
            .await
    }

    pub async fn load_order(&self, order_id: Uuid) -> ViewState<OrderDto> {
        let (orders, currency) = (self.orders.clone(), self.currency.clone());
        self.order_detail
            .run(move || Ok(OrderDto::from_details(orders.get_order(order_id)?, &currency)))
            .await
    }

    pub async fn track_order(&self, order_id: Uuid) -> ViewState<Vec<OrderTrackingDto>> {
        let orders = self.orders.clone();
        self.tracking
            .run(move || Ok(to_tracking_dtos(orders.track_order(order_id)?)))
            .await
    }

    pub async fn track_all(&self, user_id: Uuid) -> ViewState<Vec<OrderTrackingDto>> {
        let orders = self.orders.clone();
        self.tracking
            .run(move || Ok(to_tracking_dtos(orders.track_user_orders(user_id)?)))
            .await
    }

    pub async fn cancel(&self, order_id: Uuid) -> ViewState<Vec<OrderTrackingDto>> {
        let orders = self.orders.clone();
        self.tracking
            .run(move || {
                orders.cancel_order(order_id)?;
                Ok(to_tracking_dtos(orders.track_order(order_id)?))
            })
            .await
    }
}

// ============================================================================
// NOTIFICATIONS
// ============================================================================

pub struct NotificationsViewModel {
    notifications: Arc<NotificationService>,
    pub inbox: StateHolder<Vec<NotificationDto>>,
    pub unread: StateHolder<u32>,
}

impl NotificationsViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            notifications: state.notification_service.clone(),
            inbox: StateHolder::new(),
            unread: StateHolder::new(),
        }
    }

    pub fn unread_stream(&self) -> watch::Receiver<ViewState<u32>> {
        self.unread.subscribe()
    }

    pub async fn load(&self, user_id: Uuid) -> ViewState<Vec<NotificationDto>> {
        let notifications = self.notifications.clone();
        let state = self
            .inbox
            .run(move || Ok(to_notification_dtos(notifications.list(user_id)?)))
            .await;
        self.refresh_unread(user_id).await;
        state
    }

    pub async fn refresh_unread(&self, user_id: Uuid) -> ViewState<u32> {
        let notifications = self.notifications.clone();
        self.unread.run(move || notifications.unread_count(user_id)).await
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> ViewState<Vec<NotificationDto>> {
        let notifications = self.notifications.clone();
        let state = self
            .inbox
            .run(move || {
                notifications.mark_read(notification_id)?;
                Ok(to_notification_dtos(notifications.list(user_id)?))
            })
            .await;
        self.refresh_unread(user_id).await;
        state
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> ViewState<Vec<NotificationDto>> {
        let notifications = self.notifications.clone();
        let state = self
            .inbox
            .run(move || {
                notifications.mark_all_read(user_id)?;
                Ok(to_notification_dtos(notifications.list(user_id)?))
            })
            .await;
        self.refresh_unread(user_id).await;
        state
    }

    pub async fn delete(&self, user_id: Uuid, notification_id: Uuid) -> ViewState<Vec<NotificationDto>> {
        let notifications = self.notifications.clone();
        let state = self
            .inbox
            .run(move || {
                notifications.delete(notification_id)?;
                Ok(to_notification_dtos(notifications.list(user_id)?))
            })
            .await;
        self.refresh_unread(user_id).await;
        state
    }
}

fn to_product_dtos(products: Vec<crate::domain::Product>, currency: &str) -> Vec<ProductDto> {
    products
        .into_iter()
        .map(|product| ProductDto::new(product, currency))
        .collect()
}

fn to_tracking_dtos(tracking: Vec<crate::domain::OrderTracking>) -> Vec<OrderTrackingDto> {
    tracking.into_iter().map(OrderTrackingDto::from).collect()
}

fn to_notification_dtos(notifications: Vec<crate::domain::Notification>) -> Vec<NotificationDto> {
    notifications.into_iter().map(NotificationDto::from).collect()
}
