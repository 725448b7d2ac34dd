// src/services/wishlist_service.rs
use crate::domain::cart::CartItem;
use crate::domain::product::Product;
use crate::domain::wishlist::WishlistItem;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, WishlistChanged};
use crate::repositories::{ProductRepository, WishlistRepository};
use crate::services::cart_service::{AddToCartRequest, CartService};
use std::sync::Arc;
use uuid::Uuid;

pub struct WishlistService {
    wishlist_repo: Arc<dyn WishlistRepository>,
    product_repo: Arc<dyn ProductRepository>,
    cart_service: Arc<CartService>,
    event_bus: Arc<EventBus>,
}

impl WishlistService {
    pub fn new(
        wishlist_repo: Arc<dyn WishlistRepository>,
        product_repo: Arc<dyn ProductRepository>,
        cart_service: Arc<CartService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            wishlist_repo,
            product_repo,
            cart_service,
            event_bus,
        }
    }

    pub fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        if self.product_repo.get_by_id(product_id)?.is_none() {
            return Err(AppError::NotFound);
        }

        self.wishlist_repo.add(&WishlistItem::new(user_id, product_id))?;
        self.event_bus.emit(WishlistChanged::new(user_id, product_id, true));
        Ok(())
    }

    pub fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        self.wishlist_repo.remove(user_id, product_id)?;
        self.event_bus.emit(WishlistChanged::new(user_id, product_id, false));
        Ok(())
    }

    /// Flip membership. Returns true when the product is now wishlisted.
    pub fn toggle(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        if self.wishlist_repo.contains(user_id, product_id)? {
            self.remove(user_id, product_id)?;
            Ok(false)
        } else {
            self.add(user_id, product_id)?;
            Ok(true)
        }
    }

    pub fn contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        self.wishlist_repo.contains(user_id, product_id)
    }

    pub fn list(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        self.wishlist_repo.list_products(user_id)
    }

    pub fn clear(&self, user_id: Uuid) -> AppResult<()> {
        self.wishlist_repo.clear(user_id)
    }

    /// Put one unit of the product in the cart, then drop it from the wishlist.
    /// The wishlist is left untouched if the cart rejects the item.
    pub fn move_to_cart(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        size: String,
        color: String,
    ) -> AppResult<CartItem> {
        let item = self.cart_service.add_item(AddToCartRequest {
            user_id,
            product_id,
            size,
            color,
            quantity: 1,
        })?;

        self.remove(user_id, product_id)?;
        Ok(item)
    }
}
