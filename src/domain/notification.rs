use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// An in-app message shown in the user's inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,

    /// Order the message refers to, for order updates
    pub order_id: Option<Uuid>,

    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Order,
    Promotion,
    System,
}

impl Notification {
    pub fn new(user_id: Uuid, kind: NotificationKind, title: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title,
            body,
            order_id: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn for_order(user_id: Uuid, order_id: Uuid, title: String, body: String) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::new(user_id, NotificationKind::Order, title, body)
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Order => write!(f, "order"),
            NotificationKind::Promotion => write!(f, "promotion"),
            NotificationKind::System => write!(f, "system"),
        }
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(NotificationKind::Order),
            "promotion" => Ok(NotificationKind::Promotion),
            "system" => Ok(NotificationKind::System),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown notification kind '{}'",
                other
            ))),
        }
    }
}

pub fn validate_notification(notification: &Notification) -> DomainResult<()> {
    if notification.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Notification title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
