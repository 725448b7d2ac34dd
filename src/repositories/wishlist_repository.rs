// src/repositories/wishlist_repository.rs

use std::sync::Arc;
use rusqlite::params;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::product::Product;
use crate::domain::wishlist::WishlistItem;
use crate::error::AppResult;
use crate::repositories::product_repository::SqliteProductRepository;

#[cfg_attr(test, mockall::automock)]
pub trait WishlistRepository: Send + Sync {
    fn add(&self, item: &WishlistItem) -> AppResult<()>;
    fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()>;
    fn contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool>;
    fn list_products(&self, user_id: Uuid) -> AppResult<Vec<Product>>;
    fn clear(&self, user_id: Uuid) -> AppResult<()>;
}

pub struct SqliteWishlistRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteWishlistRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl WishlistRepository for SqliteWishlistRepository {
    fn add(&self, item: &WishlistItem) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR IGNORE INTO wishlist_items (user_id, product_id, added_at)
             VALUES (?1, ?2, ?3)",
            params![
                item.user_id.to_string(),
                item.product_id.to_string(),
                item.added_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM wishlist_items WHERE user_id = ?1 AND product_id = ?2",
            params![user_id.to_string(), product_id.to_string()],
        )?;

        Ok(())
    }

    fn contains(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM wishlist_items WHERE user_id = ?1 AND product_id = ?2",
            params![user_id.to_string(), product_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn list_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.description, p.category, p.brand, p.price_cents,
                    p.discount_percent, p.image_url, p.sizes, p.colors, p.rating, p.stock,
                    p.created_at, p.updated_at
             FROM wishlist_items w
             JOIN products p ON p.id = w.product_id
             WHERE w.user_id = ?1
             ORDER BY w.added_at DESC",
        )?;

        let products = stmt
            .query_map(params![user_id.to_string()], SqliteProductRepository::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    fn clear(&self, user_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM wishlist_items WHERE user_id = ?1", params![user_id.to_string()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;
    use crate::domain::{ProductCategory, User};
    use crate::repositories::{ProductRepository, SqliteUserRepository, UserRepository};

    #[test]
    fn test_add_is_idempotent_and_listing_joins_products() {
        let (_dir, pool) = test_pool();

        let user = User::new("ana@example.com".to_string(), "Ana".to_string(), "h".to_string(), "s".to_string());
        SqliteUserRepository::new(pool.clone()).save(&user).unwrap();

        let product = Product::new("Tote Bag".to_string(), ProductCategory::Accessories, 1800);
        SqliteProductRepository::new(pool.clone()).save(&product).unwrap();

        let repo = SqliteWishlistRepository::new(pool);
        repo.add(&WishlistItem::new(user.id, product.id)).unwrap();
        repo.add(&WishlistItem::new(user.id, product.id)).unwrap();

        let listed = repo.list_products(user.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Tote Bag");
        assert!(repo.contains(user.id, product.id).unwrap());

        repo.remove(user.id, product.id).unwrap();
        assert!(!repo.contains(user.id, product.id).unwrap());

        repo.add(&WishlistItem::new(user.id, product.id)).unwrap();
        repo.clear(user.id).unwrap();
        assert!(repo.list_products(user.id).unwrap().is_empty());
    }
}
