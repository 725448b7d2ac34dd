use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product saved for later by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    pub fn new(user_id: Uuid, product_id: Uuid) -> Self {
        Self {
            user_id,
            product_id,
            added_at: Utc::now(),
        }
    }
}
