use super::entity::{Order, OrderItem};
use crate::domain::{DomainError, DomainResult};

/// Validates an order together with its items before it is persisted
pub fn validate_order(order: &Order, items: &[OrderItem]) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Order must contain at least one item".to_string(),
        ));
    }

    if let Some(foreign) = items.iter().find(|i| i.order_id != order.id) {
        return Err(DomainError::InvariantViolation(format!(
            "Item {} does not belong to order {}",
            foreign.id, order.id
        )));
    }

    if items.iter().any(|i| i.quantity == 0) {
        return Err(DomainError::InvariantViolation(
            "Order items need a positive quantity".to_string(),
        ));
    }

    let subtotal: i64 = items.iter().map(OrderItem::line_total_cents).sum();
    if subtotal != order.subtotal_cents {
        return Err(DomainError::InvariantViolation(format!(
            "Subtotal {} does not match item total {}",
            order.subtotal_cents, subtotal
        )));
    }

    if order.total_cents != order.subtotal_cents + order.shipping_cents {
        return Err(DomainError::InvariantViolation(
            "Total must equal subtotal plus shipping".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::sample_address;
    use crate::domain::payment::PaymentMethod;
    use uuid::Uuid;

    fn order_with_items(subtotal: i64) -> (Order, Vec<OrderItem>) {
        let order = Order::new(Uuid::new_v4(), sample_address(), PaymentMethod::Wallet, subtotal, 499);
        let items = vec![
            OrderItem::new(order.id, Uuid::new_v4(), "Tee".to_string(), "M".to_string(), "Black".to_string(), 2, 1000),
            OrderItem::new(order.id, Uuid::new_v4(), "Cap".to_string(), String::new(), String::new(), 1, 800),
        ];
        (order, items)
    }

    #[test]
    fn test_consistent_order_passes() {
        let (order, items) = order_with_items(2800);
        assert!(validate_order(&order, &items).is_ok());
    }

    #[test]
    fn test_subtotal_mismatch_fails() {
        let (order, items) = order_with_items(2000);
        assert!(validate_order(&order, &items).is_err());
    }

    #[test]
    fn test_empty_order_fails() {
        let (order, _) = order_with_items(0);
        assert!(validate_order(&order, &[]).is_err());
    }
}
