//! Cart invariants:
//!
//! 1. One line per (user, product, size, color), adding again merges quantities
//! 2. Quantity stays within 1..=99, zero removes the line
//! 3. Prices are never stored in the cart, lines are priced on read

pub mod entity;

pub use entity::{CartItem, CartLine, CartSummary};

use crate::domain::{DomainError, DomainResult};

pub const MAX_LINE_QUANTITY: u32 = 99;

pub fn validate_quantity(quantity: u32) -> DomainResult<()> {
    if quantity == 0 || quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::InvariantViolation(format!(
            "Quantity {} outside 1-{}",
            quantity, MAX_LINE_QUANTITY
        )));
    }
    Ok(())
}
