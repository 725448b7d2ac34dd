// src/services/checkout_service.rs
//
// Turns a user's cart into an order.
//
// Stock is checked here to fail fast with a precise error, and again by
// the guarded UPDATE inside OrderRepository::place_order so concurrent
// checkouts cannot oversell.

use crate::config::ShippingRules;
use crate::domain::address::{validate_address, ShippingAddress};
use crate::domain::cart::CartSummary;
use crate::domain::order::{validate_order, Order, OrderItem};
use crate::domain::payment::{validate_payment, PaymentMethod};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, OrderPlaced};
use crate::repositories::{CartRepository, OrderRepository};
use std::sync::Arc;
use uuid::Uuid;

pub struct CheckoutService {
    cart_repo: Arc<dyn CartRepository>,
    order_repo: Arc<dyn OrderRepository>,
    event_bus: Arc<EventBus>,
    shipping: ShippingRules,
}

impl CheckoutService {
    pub fn new(
        cart_repo: Arc<dyn CartRepository>,
        order_repo: Arc<dyn OrderRepository>,
        event_bus: Arc<EventBus>,
        shipping: ShippingRules,
    ) -> Self {
        Self {
            cart_repo,
            order_repo,
            event_bus,
            shipping,
        }
    }

    pub fn preview(&self, user_id: Uuid) -> AppResult<CartSummary> {
        let lines = self.cart_repo.list_lines(user_id)?;
        Ok(CartSummary::from_lines(lines, &self.shipping))
    }

    pub fn place_order(
        &self,
        user_id: Uuid,
        address: ShippingAddress,
        payment: PaymentMethod,
    ) -> AppResult<Order> {
        let summary = self.preview(user_id)?;
        if summary.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }

        validate_address(&address)?;
        validate_payment(&payment)?;

        for line in &summary.lines {
            if line.item.quantity > line.stock {
                return Err(AppError::Domain(DomainError::InsufficientStock {
                    product_id: line.item.product_id,
                    requested: line.item.quantity,
                    available: line.stock,
                }));
            }
        }

        let order = Order::new(
            user_id,
            address,
            payment,
            summary.subtotal_cents,
            summary.shipping_cents,
        );

        let items: Vec<OrderItem> = summary
            .lines
            .iter()
            .map(|line| {
                OrderItem::new(
                    order.id,
                    line.item.product_id,
                    line.product_name.clone(),
                    line.item.size.clone(),
                    line.item.color.clone(),
                    line.item.quantity,
                    line.unit_price_cents,
                )
            })
            .collect();

        validate_order(&order, &items)?;
        self.order_repo.place_order(&order, &items)?;

        self.event_bus.emit(OrderPlaced::new(
            order.id,
            user_id,
            order.total_cents,
            summary.item_count,
        ));

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::sample_address;
    use crate::domain::cart::{CartItem, CartLine};
    use crate::repositories::{MockCartRepository, MockOrderRepository};

    fn line(quantity: u32, stock: u32, unit_price_cents: i64) -> CartLine {
        CartLine {
            item: CartItem::new(Uuid::nil(), Uuid::new_v4(), "M".to_string(), "Red".to_string(), quantity),
            product_name: "Scarf".to_string(),
            image_url: None,
            unit_price_cents,
            stock,
        }
    }

    fn service(lines: Vec<CartLine>, orders: MockOrderRepository) -> (CheckoutService, Arc<EventBus>) {
        let mut cart = MockCartRepository::new();
        cart.expect_list_lines().returning(move |_| Ok(lines.clone()));
        let bus = Arc::new(EventBus::new());
        (
            CheckoutService::new(Arc::new(cart), Arc::new(orders), bus.clone(), ShippingRules::default()),
            bus,
        )
    }

    #[test]
    fn test_place_order_snapshots_cart() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_place_order()
            .withf(|order: &Order, items: &[OrderItem]| {
                items.len() == 2
                    && items.iter().all(|i| i.order_id == order.id)
                    && order.subtotal_cents == 2 * 1200 + 800
                    && order.shipping_cents == 499
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (service, bus) = service(vec![line(2, 5, 1200), line(1, 1, 800)], orders);
        let order = service
            .place_order(Uuid::nil(), sample_address(), PaymentMethod::CashOnDelivery)
            .unwrap();

        assert_eq!(order.total_cents, 3200 + 499);
        let events = bus.get_event_log();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "OrderPlaced");
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut orders = MockOrderRepository::new();
        orders.expect_place_order().never();

        let (service, _) = service(vec![], orders);
        let result = service.place_order(Uuid::nil(), sample_address(), PaymentMethod::Wallet);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_invalid_card_rejected() {
        let mut orders = MockOrderRepository::new();
        orders.expect_place_order().never();

        let (service, _) = service(vec![line(1, 5, 1000)], orders);
        let result = service.place_order(
            Uuid::nil(),
            sample_address(),
            PaymentMethod::Card { last4: "12".to_string() },
        );
        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_stock_checked_before_writing() {
        let mut orders = MockOrderRepository::new();
        orders.expect_place_order().never();

        let (service, _) = service(vec![line(3, 2, 1000)], orders);
        let result = service.place_order(Uuid::nil(), sample_address(), PaymentMethod::CashOnDelivery);
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InsufficientStock { requested: 3, available: 2, .. }))
        ));
    }
}
