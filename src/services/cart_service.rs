// src/services/cart_service.rs
use crate::config::ShippingRules;
use crate::domain::cart::{validate_quantity, CartItem, CartSummary};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{CartUpdated, EventBus};
use crate::repositories::{CartRepository, ProductRepository};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AddToCartRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

pub struct CartService {
    cart_repo: Arc<dyn CartRepository>,
    product_repo: Arc<dyn ProductRepository>,
    event_bus: Arc<EventBus>,
    shipping: ShippingRules,
}

impl CartService {
    pub fn new(
        cart_repo: Arc<dyn CartRepository>,
        product_repo: Arc<dyn ProductRepository>,
        event_bus: Arc<EventBus>,
        shipping: ShippingRules,
    ) -> Self {
        Self {
            cart_repo,
            product_repo,
            event_bus,
            shipping,
        }
    }

    /// Add a product variant to the cart, merging with an identical line.
    pub fn add_item(&self, request: AddToCartRequest) -> AppResult<CartItem> {
        let product = self
            .product_repo
            .get_by_id(request.product_id)?
            .ok_or(AppError::NotFound)?;

        if !product.offers_size(&request.size) {
            return Err(AppError::Validation(format!(
                "{} is not available in size '{}'",
                product.name, request.size
            )));
        }
        let color = product
            .stored_color(&request.color)
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "{} is not available in colour '{}'",
                    product.name, request.color
                ))
            })?;

        validate_quantity(request.quantity)?;

        let item = match self.cart_repo.find_item(
            request.user_id,
            request.product_id,
            &request.size,
            &color,
        )? {
            Some(mut existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| AppError::Validation("Cart quantity is too large".to_string()))?;
                existing
            }
            None => CartItem::new(
                request.user_id,
                request.product_id,
                request.size,
                color,
                request.quantity,
            ),
        };

        validate_quantity(item.quantity)?;
        if item.quantity > product.stock {
            return Err(AppError::Domain(DomainError::InsufficientStock {
                product_id: product.id,
                requested: item.quantity,
                available: product.stock,
            }));
        }

        self.cart_repo.save_item(&item)?;
        self.publish(item.user_id)?;

        Ok(item)
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn update_quantity(&self, item_id: Uuid, quantity: u32) -> AppResult<()> {
        let mut item = self.cart_repo.get_item(item_id)?.ok_or(AppError::NotFound)?;

        if quantity == 0 {
            self.cart_repo.delete_item(item_id)?;
        } else {
            validate_quantity(quantity)?;
            item.quantity = quantity;
            self.cart_repo.save_item(&item)?;
        }

        self.publish(item.user_id)
    }

    pub fn remove_item(&self, item_id: Uuid) -> AppResult<()> {
        let item = self.cart_repo.get_item(item_id)?.ok_or(AppError::NotFound)?;
        self.cart_repo.delete_item(item_id)?;
        self.publish(item.user_id)
    }

    pub fn clear(&self, user_id: Uuid) -> AppResult<()> {
        self.cart_repo.clear(user_id)?;
        self.publish(user_id)
    }

    pub fn summary(&self, user_id: Uuid) -> AppResult<CartSummary> {
        let lines = self.cart_repo.list_lines(user_id)?;
        Ok(CartSummary::from_lines(lines, &self.shipping))
    }

    pub fn item_count(&self, user_id: Uuid) -> AppResult<u32> {
        self.cart_repo.count_items(user_id)
    }

    fn publish(&self, user_id: Uuid) -> AppResult<()> {
        let count = self.cart_repo.count_items(user_id)?;
        self.event_bus.emit(CartUpdated::new(user_id, count));
        Ok(())
    }
}
