pub mod entity;
pub mod invariants;

pub use entity::{Order, OrderItem, OrderStatus};
pub use invariants::validate_order;
