// src/services/catalog_service.rs
use crate::domain::product::{validate_product, Product, ProductCategory};
use crate::error::{AppError, AppResult};
use crate::repositories::ProductRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct CatalogService {
    product_repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    pub fn list_products(&self) -> AppResult<Vec<Product>> {
        self.product_repo.list_all()
    }

    pub fn products_in_category(&self, category: ProductCategory) -> AppResult<Vec<Product>> {
        self.product_repo.list_by_category(category)
    }

    /// A blank query lists the whole catalog
    pub fn search(&self, query: &str) -> AppResult<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return self.product_repo.list_all();
        }
        self.product_repo.search(query)
    }

    pub fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        self.product_repo
            .get_by_id(product_id)?
            .ok_or(AppError::NotFound)
    }

    pub fn find_product(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        self.product_repo.get_by_id(product_id)
    }

    pub fn top_rated(&self, limit: u32) -> AppResult<Vec<Product>> {
        self.product_repo.top_rated(limit)
    }

    pub fn categories(&self) -> Vec<ProductCategory> {
        ProductCategory::ALL.to_vec()
    }

    pub fn save_product(&self, product: &Product) -> AppResult<()> {
        validate_product(product)?;
        self.product_repo.save(product)
    }

    pub fn restock(&self, product_id: Uuid, stock: u32) -> AppResult<()> {
        self.product_repo.update_stock(product_id, stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockProductRepository;

    #[test]
    fn test_blank_search_lists_everything() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_all().times(1).returning(|| Ok(vec![]));
        repo.expect_search().never();

        let service = CatalogService::new(Arc::new(repo));
        assert!(service.search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_search_trims_query() {
        let mut repo = MockProductRepository::new();
        repo.expect_search()
            .withf(|query: &str| query == "linen")
            .times(1)
            .returning(|_| Ok(vec![Product::new("Linen Shirt".to_string(), ProductCategory::Men, 2500)]));

        let service = CatalogService::new(Arc::new(repo));
        assert_eq!(service.search(" linen ").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(repo));
        assert!(matches!(service.get_product(Uuid::new_v4()), Err(AppError::NotFound)));
    }

    #[test]
    fn test_invalid_product_never_saved() {
        let mut repo = MockProductRepository::new();
        repo.expect_save().never();

        let service = CatalogService::new(Arc::new(repo));
        let product = Product::new(String::new(), ProductCategory::Kids, 1000);
        assert!(matches!(service.save_product(&product), Err(AppError::Domain(_))));
    }
}
