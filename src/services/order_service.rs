// src/services/order_service.rs
use crate::domain::order::{Order, OrderItem, OrderStatus};
use crate::domain::tracking::{build_tracking, OrderTracking};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, OrderCancelled, OrderStatusChanged};
use crate::repositories::OrderRepository;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// An order together with its lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub struct OrderService {
    order_repo: Arc<dyn OrderRepository>,
    event_bus: Arc<EventBus>,
}

impl OrderService {
    pub fn new(order_repo: Arc<dyn OrderRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            order_repo,
            event_bus,
        }
    }

    pub fn list_orders(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        self.order_repo.list_by_user(user_id)
    }

    pub fn get_order(&self, order_id: Uuid) -> AppResult<OrderDetails> {
        let order = self.order_repo.get_by_id(order_id)?.ok_or(AppError::NotFound)?;
        let items = self.order_repo.list_items(order_id)?;
        Ok(OrderDetails { order, items })
    }

    /// Per-line tracking summaries for one order
    pub fn track_order(&self, order_id: Uuid) -> AppResult<Vec<OrderTracking>> {
        if self.order_repo.get_by_id(order_id)?.is_none() {
            return Err(AppError::NotFound);
        }
        let rows = self.order_repo.tracking_rows(order_id)?;
        Ok(build_tracking(rows))
    }

    pub fn track_user_orders(&self, user_id: Uuid) -> AppResult<Vec<OrderTracking>> {
        let rows = self.order_repo.tracking_rows_for_user(user_id)?;
        Ok(build_tracking(rows))
    }

    /// Move the order to its next delivery stage
    pub fn advance_status(&self, order_id: Uuid) -> AppResult<OrderStatus> {
        let order = self.order_repo.get_by_id(order_id)?.ok_or(AppError::NotFound)?;

        let next = order.status.next().ok_or_else(|| {
            DomainError::InvalidStateTransition(format!(
                "Order {} is already {}",
                order.id, order.status
            ))
        })?;

        self.order_repo.update_status(order.id, next, Utc::now())?;

        log::info!("Order {} moved {} -> {}", order.id, order.status, next);
        self.event_bus.emit(OrderStatusChanged::new(
            order.id,
            order.user_id,
            order.status,
            next,
        ));

        Ok(next)
    }

    pub fn cancel_order(&self, order_id: Uuid) -> AppResult<()> {
        let order = self.order_repo.get_by_id(order_id)?.ok_or(AppError::NotFound)?;

        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(AppError::Domain(DomainError::InvalidStateTransition(format!(
                "Order {} cannot be cancelled once {}",
                order.id, order.status
            ))));
        }

        self.order_repo.cancel(order.id, Utc::now())?;

        log::info!("Order {} cancelled", order.id);
        self.event_bus.emit(OrderCancelled::new(order.id, order.user_id));

        Ok(())
    }
}
