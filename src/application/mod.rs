// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above services, below any UI
// - View models expose observable state and proxy one service call each
// - Translates domain entities to DTOs on the way out
// - Maps AppError to ErrorResponse at the boundary

pub mod dto;
pub mod error_handling;
pub mod seed;
pub mod state;
pub mod view_models;
pub mod view_state;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use seed::seed_catalog;
pub use state::AppState;
pub use view_models::*;
pub use view_state::{StateHolder, ViewState};
