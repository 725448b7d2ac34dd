// src/events/bus/event_bus.rs
//
// In-process fan-out for storefront events.
//
// Checkout, order and account services publish facts here (an order was
// placed, a status moved, a cart changed). Listeners such as the
// notification inbox react without the publisher knowing about them.
// Delivery is synchronous on the emitting thread, one handler at a time,
// in the order handlers were registered.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::events::types::DomainEvent;

/// Handler with the concrete event type erased; it downcasts on entry
type EventHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Registry of listeners keyed by event type, plus a record of every
/// emission. A listener that panics is logged and skipped.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,

    /// Every emission, oldest first
    event_log: Arc<RwLock<Vec<EventLogEntry>>>,
}

/// One emission as recorded by the bus
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to a specific event type
    ///
    /// Handlers are executed in the order they are subscribed.
    ///
    /// ```ignore
    /// bus.subscribe::<OrderPlaced, _>(|event| {
    ///     log::info!("order {} placed", event.order_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();

        let wrapped: EventHandler = Arc::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.entry(type_id).or_default().push(wrapped);
    }

    /// Emit an event
    ///
    /// Logs the event, then runs every handler for its type. Handlers are
    /// cloned out of the registry first, so a handler may itself emit or
    /// subscribe without deadlocking.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let type_id = TypeId::of::<E>();

        let event_handlers: Vec<EventHandler> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers.get(&type_id).cloned().unwrap_or_default()
        };

        let log_entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: event_handlers.len(),
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            log_entry.event_type,
            log_entry.event_id,
            log_entry.handler_count
        );

        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(log_entry);

        for (idx, handler) in event_handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any);
            }));

            if let Err(e) = result {
                log::warn!(
                    "Handler {} for {} panicked: {:?}",
                    idx,
                    event.event_type(),
                    e
                );
            }
        }
    }

    /// Get the event log (for debugging)
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the event log
    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of subscribers for a specific event type
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        let type_id = TypeId::of::<E>();
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(&type_id).map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Cloning shares the same registry and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[test]
    fn test_listener_receives_event_payload() {
        let bus = EventBus::new();
        let seen = Arc::new(RwLock::new(None));
        let order_id = Uuid::new_v4();

        let sink = Arc::clone(&seen);
        bus.subscribe::<OrderPlaced, _>(move |event| {
            *sink.write().unwrap() = Some((event.order_id, event.total_cents));
        });

        bus.emit(OrderPlaced::new(order_id, Uuid::new_v4(), 2500, 2));

        assert_eq!(*seen.read().unwrap(), Some((order_id, 2500)));
    }

    #[test]
    fn test_cart_listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let calls = Arc::new(RwLock::new(Vec::new()));

        for name in ["badge", "summary", "analytics"] {
            let calls = Arc::clone(&calls);
            bus.subscribe::<CartUpdated, _>(move |_| {
                calls.write().unwrap().push(name);
            });
        }

        bus.emit(CartUpdated::new(Uuid::new_v4(), 1));

        assert_eq!(*calls.read().unwrap(), vec!["badge", "summary", "analytics"]);
    }

    #[test]
    fn test_emissions_are_recorded_with_listener_count() {
        let bus = EventBus::new();
        bus.subscribe::<OrderStatusChanged, _>(|_| {});

        bus.emit(UserRegistered::new(Uuid::new_v4(), "ana@example.com".to_string()));
        bus.emit(OrderStatusChanged::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            OrderStatus::Placed,
            OrderStatus::Confirmed,
        ));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "UserRegistered");
        assert_eq!(log[0].handler_count, 0);
        assert_eq!(log[1].event_type, "OrderStatusChanged");
        assert_eq!(log[1].handler_count, 1);

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_listeners_are_scoped_to_their_event_type() {
        let bus = EventBus::new();
        let cancelled = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&cancelled);
        bus.subscribe::<OrderCancelled, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(OrderPlaced::new(Uuid::new_v4(), Uuid::new_v4(), 100, 1));
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count::<OrderCancelled>(), 1);
        assert_eq!(bus.subscriber_count::<OrderPlaced>(), 0);
    }

    #[test]
    fn test_failing_listener_does_not_block_inbox() {
        let bus = EventBus::new();
        let delivered = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<OrderCancelled, _>(|_| panic!("listener failed"));

        let counter = Arc::clone(&delivered);
        bus.subscribe::<OrderCancelled, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(OrderCancelled::new(Uuid::new_v4(), Uuid::new_v4()));

        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_emit_nested_event() {
        let bus = Arc::new(EventBus::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let inner_bus = Arc::clone(&bus);
        bus.subscribe::<OrderPlaced, _>(move |event| {
            inner_bus.emit(NotificationCreated::new(Uuid::new_v4(), event.user_id));
        });

        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<NotificationCreated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(OrderPlaced::new(Uuid::new_v4(), Uuid::new_v4(), 100, 1));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.get_event_log().len(), 2);
    }
}
