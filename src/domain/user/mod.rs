pub mod entity;
pub mod invariants;

pub use entity::{Session, User};
pub use invariants::{validate_email, validate_password, validate_user};
