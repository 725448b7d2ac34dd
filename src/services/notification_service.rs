// src/services/notification_service.rs
//
// Inbox for a user. Order lifecycle events are turned into notifications
// by the handlers installed with `register_event_handlers`.

use crate::domain::notification::{validate_notification, Notification, NotificationKind};
use crate::domain::order::OrderStatus;
use crate::error::AppResult;
use crate::events::{EventBus, NotificationCreated, OrderCancelled, OrderPlaced, OrderStatusChanged};
use crate::repositories::NotificationRepository;
use chrono::{Duration, Utc};
use std::sync::{Arc, Weak};
use uuid::Uuid;

pub struct NotificationService {
    notification_repo: Arc<dyn NotificationRepository>,
    event_bus: Arc<EventBus>,
    retention: Duration,
}

impl NotificationService {
    pub fn new(
        notification_repo: Arc<dyn NotificationRepository>,
        event_bus: Arc<EventBus>,
        retention: Duration,
    ) -> Self {
        Self {
            notification_repo,
            event_bus,
            retention,
        }
    }

    pub fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: String,
        body: String,
    ) -> AppResult<Notification> {
        let notification = Notification::new(user_id, kind, title, body);
        store(&*self.notification_repo, &self.event_bus, &notification)?;
        Ok(notification)
    }

    pub fn list(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        self.notification_repo.list_by_user(user_id)
    }

    pub fn unread_count(&self, user_id: Uuid) -> AppResult<u32> {
        self.notification_repo.unread_count(user_id)
    }

    pub fn mark_read(&self, notification_id: Uuid) -> AppResult<()> {
        self.notification_repo.mark_read(notification_id)
    }

    pub fn mark_all_read(&self, user_id: Uuid) -> AppResult<usize> {
        self.notification_repo.mark_all_read(user_id)
    }

    pub fn delete(&self, notification_id: Uuid) -> AppResult<()> {
        self.notification_repo.delete(notification_id)
    }

    /// Drop notifications older than the retention window
    pub fn prune(&self) -> AppResult<usize> {
        let removed = self
            .notification_repo
            .delete_older_than(Utc::now() - self.retention)?;
        if removed > 0 {
            log::info!("Pruned {} old notifications", removed);
        }
        Ok(removed)
    }

    /// Subscribe the order notification handlers to the bus.
    ///
    /// Call once per bus. Handlers hold a weak reference to the bus so the
    /// registry does not keep itself alive.
    pub fn register_event_handlers(&self) {
        let bus = Arc::downgrade(&self.event_bus);

        let repo = self.notification_repo.clone();
        let weak = bus.clone();
        self.event_bus.subscribe::<OrderPlaced, _>(move |event| {
            let notification = Notification::for_order(
                event.user_id,
                event.order_id,
                "Order placed".to_string(),
                format!(
                    "We received order {} with {} item(s).",
                    short_id(event.order_id),
                    event.item_count
                ),
            );
            record(&*repo, &weak, &notification);
        });

        let repo = self.notification_repo.clone();
        let weak = bus.clone();
        self.event_bus.subscribe::<OrderStatusChanged, _>(move |event| {
            let notification = Notification::for_order(
                event.user_id,
                event.order_id,
                status_title(event.to).to_string(),
                format!("Order {} is now {}.", short_id(event.order_id), event.to),
            );
            record(&*repo, &weak, &notification);
        });

        let repo = self.notification_repo.clone();
        let weak = bus;
        self.event_bus.subscribe::<OrderCancelled, _>(move |event| {
            let notification = Notification::for_order(
                event.user_id,
                event.order_id,
                "Order cancelled".to_string(),
                format!("Order {} was cancelled.", short_id(event.order_id)),
            );
            record(&*repo, &weak, &notification);
        });
    }
}

fn store(
    repo: &dyn NotificationRepository,
    bus: &EventBus,
    notification: &Notification,
) -> AppResult<()> {
    validate_notification(notification)?;
    repo.save(notification)?;
    bus.emit(NotificationCreated::new(notification.id, notification.user_id));
    Ok(())
}

// Event handlers cannot return errors
fn record(repo: &dyn NotificationRepository, bus: &Weak<EventBus>, notification: &Notification) {
    let Some(bus) = bus.upgrade() else {
        return;
    };
    if let Err(e) = store(repo, &bus, notification) {
        log::warn!("Failed to store notification for {}: {}", notification.user_id, e);
    }
}

fn status_title(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Placed => "Order placed",
        OrderStatus::Confirmed => "Order confirmed",
        OrderStatus::Shipped => "Order shipped",
        OrderStatus::Delivered => "Order delivered",
        OrderStatus::Cancelled => "Order cancelled",
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_uppercase()
}
