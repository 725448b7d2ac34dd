use super::entity::Product;
use crate::domain::{DomainError, DomainResult};

/// Validates all Product invariants
pub fn validate_product(product: &Product) -> DomainResult<()> {
    if product.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Product name cannot be empty".to_string(),
        ));
    }

    if product.price_cents < 0 {
        return Err(DomainError::InvariantViolation(format!(
            "Product price cannot be negative: {}",
            product.price_cents
        )));
    }

    if product.discount_percent > 90 {
        return Err(DomainError::InvariantViolation(format!(
            "Discount {}% exceeds the 90% cap",
            product.discount_percent
        )));
    }

    if !(0.0..=5.0).contains(&product.rating) {
        return Err(DomainError::InvariantViolation(format!(
            "Rating {} outside 0-5",
            product.rating
        )));
    }

    if product.sizes.iter().any(|s| s.trim().is_empty())
        || product.colors.iter().any(|c| c.trim().is_empty())
    {
        return Err(DomainError::InvariantViolation(
            "Sizes and colors cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Invariants that must hold true for Product domain:
///
/// 1. Name cannot be empty
/// 2. Price is never negative
/// 3. Discount never exceeds 90%
/// 4. Rating stays within 0..=5
/// 5. Offered sizes/colors have no blank entries
/// 6. Stock is unsigned, overselling is rejected at checkout

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductCategory;

    #[test]
    fn test_valid_product() {
        let product = Product::new("Denim Jacket".to_string(), ProductCategory::Women, 7900);
        assert!(validate_product(&product).is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let product = Product::new("  ".to_string(), ProductCategory::Women, 7900);
        assert!(validate_product(&product).is_err());
    }

    #[test]
    fn test_excessive_discount_fails() {
        let mut product = Product::new("Belt".to_string(), ProductCategory::Accessories, 1500);
        product.discount_percent = 95;
        assert!(validate_product(&product).is_err());
    }

    #[test]
    fn test_rating_out_of_range_fails() {
        let mut product = Product::new("Belt".to_string(), ProductCategory::Accessories, 1500);
        product.rating = 5.5;
        assert!(validate_product(&product).is_err());
    }

    #[test]
    fn test_blank_size_fails() {
        let mut product = Product::new("Tee".to_string(), ProductCategory::Men, 1500);
        product.sizes = vec!["M".to_string(), " ".to_string()];
        assert!(validate_product(&product).is_err());
    }
}
