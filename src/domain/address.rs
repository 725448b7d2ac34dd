use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Delivery address captured at checkout, stored with the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

pub fn validate_address(address: &ShippingAddress) -> DomainResult<()> {
    let required = [
        ("full_name", &address.full_name),
        ("line1", &address.line1),
        ("city", &address.city),
        ("postal_code", &address.postal_code),
        ("country", &address.country),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "Shipping address field '{}' cannot be empty",
                field
            )));
        }
    }

    let digits = address.phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 7 {
        return Err(DomainError::InvariantViolation(format!(
            "Phone number '{}' is too short",
            address.phone
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ana Souza".to_string(),
        line1: "Rua das Flores 12".to_string(),
        line2: None,
        city: "Lisboa".to_string(),
        postal_code: "1100-001".to_string(),
        country: "PT".to_string(),
        phone: "+351 912 345 678".to_string(),
    }
}
