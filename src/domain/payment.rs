use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// How an order is paid. Only the method is recorded, no card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Card { last4: String },
    Wallet,
}

impl PaymentMethod {
    pub fn label(&self) -> String {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on delivery".to_string(),
            PaymentMethod::Card { last4 } => format!("Card ending in {}", last4),
            PaymentMethod::Wallet => "Wallet".to_string(),
        }
    }
}

pub fn validate_payment(payment: &PaymentMethod) -> DomainResult<()> {
    if let PaymentMethod::Card { last4 } = payment {
        if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvariantViolation(
                "Card reference must be the last 4 digits".to_string(),
            ));
        }
    }
    Ok(())
}
