// src/repositories/cart_repository.rs
//
// Cart persistence. Lines are priced on read by joining products.

use std::sync::Arc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::cart::{CartItem, CartLine};
use crate::error::AppResult;
use crate::repositories::mapping::{timestamp_col, u32_col, uuid_col};

#[cfg_attr(test, mockall::automock)]
pub trait CartRepository: Send + Sync {
    fn find_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        size: &str,
        color: &str,
    ) -> AppResult<Option<CartItem>>;
    fn get_item(&self, item_id: Uuid) -> AppResult<Option<CartItem>>;
    fn save_item(&self, item: &CartItem) -> AppResult<()>;
    fn delete_item(&self, item_id: Uuid) -> AppResult<()>;
    fn list_lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;
    fn clear(&self, user_id: Uuid) -> AppResult<()>;
    fn count_items(&self, user_id: Uuid) -> AppResult<u32>;
}

pub struct SqliteCartRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCartRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_item(row: &Row) -> Result<CartItem, rusqlite::Error> {
        Ok(CartItem {
            id: uuid_col(row, "id")?,
            user_id: uuid_col(row, "user_id")?,
            product_id: uuid_col(row, "product_id")?,
            size: row.get("size")?,
            color: row.get("color")?,
            quantity: u32_col(row, "quantity")?,
            added_at: timestamp_col(row, "added_at")?,
        })
    }

    fn row_to_line(row: &Row) -> Result<CartLine, rusqlite::Error> {
        Ok(CartLine {
            item: Self::row_to_item(row)?,
            product_name: row.get("product_name")?,
            image_url: row.get("image_url")?,
            unit_price_cents: row.get("unit_price_cents")?,
            stock: u32_col(row, "stock")?,
        })
    }
}

impl CartRepository for SqliteCartRepository {
    fn find_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        size: &str,
        color: &str,
    ) -> AppResult<Option<CartItem>> {
        let conn = self.pool.get()?;

        let item = conn
            .query_row(
                "SELECT id, user_id, product_id, size, color, quantity, added_at
                 FROM cart_items
                 WHERE user_id = ?1 AND product_id = ?2 AND size = ?3 AND color = ?4",
                params![user_id.to_string(), product_id.to_string(), size, color],
                Self::row_to_item,
            )
            .optional()?;

        Ok(item)
    }

    fn get_item(&self, item_id: Uuid) -> AppResult<Option<CartItem>> {
        let conn = self.pool.get()?;

        let item = conn
            .query_row(
                "SELECT id, user_id, product_id, size, color, quantity, added_at
                 FROM cart_items WHERE id = ?1",
                params![item_id.to_string()],
                Self::row_to_item,
            )
            .optional()?;

        Ok(item)
    }

    fn save_item(&self, item: &CartItem) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO cart_items (id, user_id, product_id, size, color, quantity, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET quantity = excluded.quantity",
            params![
                item.id.to_string(),
                item.user_id.to_string(),
                item.product_id.to_string(),
                item.size,
                item.color,
                i64::from(item.quantity),
                item.added_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM cart_items WHERE id = ?1", params![item_id.to_string()])?;
        Ok(())
    }

    fn list_lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.user_id, c.product_id, c.size, c.color, c.quantity, c.added_at,
                    p.name AS product_name,
                    p.image_url,
                    p.price_cents * (100 - p.discount_percent) / 100 AS unit_price_cents,
                    p.stock
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = ?1
             ORDER BY c.added_at, p.name",
        )?;

        let lines = stmt
            .query_map(params![user_id.to_string()], Self::row_to_line)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lines)
    }

    fn clear(&self, user_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM cart_items WHERE user_id = ?1", params![user_id.to_string()])?;
        Ok(())
    }

    fn count_items(&self, user_id: Uuid) -> AppResult<u32> {
        let conn = self.pool.get()?;

        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(total as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;
    use crate::domain::{Product, ProductCategory, User};
    use crate::repositories::{
        ProductRepository, SqliteProductRepository, SqliteUserRepository, UserRepository,
    };

    struct Fixture {
        _dir: tempfile::TempDir,
        repo: SqliteCartRepository,
        user: User,
        product: Product,
    }

    fn fixture() -> Fixture {
        let (dir, pool) = test_pool();

        let user = User::new("ana@example.com".to_string(), "Ana".to_string(), "h".to_string(), "s".to_string());
        SqliteUserRepository::new(pool.clone()).save(&user).unwrap();

        let mut product = Product::new("Hoodie".to_string(), ProductCategory::Men, 4000);
        product.discount_percent = 25;
        product.stock = 3;
        SqliteProductRepository::new(pool.clone()).save(&product).unwrap();

        Fixture {
            _dir: dir,
            repo: SqliteCartRepository::new(pool),
            user,
            product,
        }
    }

    #[test]
    fn test_lines_are_priced_with_discount() {
        let f = fixture();
        let item = CartItem::new(f.user.id, f.product.id, "L".to_string(), "Grey".to_string(), 2);
        f.repo.save_item(&item).unwrap();

        let lines = f.repo.list_lines(f.user.id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_name, "Hoodie");
        assert_eq!(lines[0].unit_price_cents, 3000);
        assert_eq!(lines[0].line_total_cents(), 6000);
        assert_eq!(lines[0].stock, 3);
    }

    #[test]
    fn test_find_item_matches_full_key() {
        let f = fixture();
        let item = CartItem::new(f.user.id, f.product.id, "L".to_string(), "Grey".to_string(), 1);
        f.repo.save_item(&item).unwrap();

        assert!(f.repo.find_item(f.user.id, f.product.id, "L", "Grey").unwrap().is_some());
        assert!(f.repo.find_item(f.user.id, f.product.id, "M", "Grey").unwrap().is_none());
        assert!(f.repo.find_item(f.user.id, f.product.id, "L", "Red").unwrap().is_none());
    }

    #[test]
    fn test_save_existing_item_updates_quantity() {
        let f = fixture();
        let mut item = CartItem::new(f.user.id, f.product.id, String::new(), String::new(), 1);
        f.repo.save_item(&item).unwrap();

        item.quantity = 4;
        f.repo.save_item(&item).unwrap();

        assert_eq!(f.repo.get_item(item.id).unwrap().unwrap().quantity, 4);
        assert_eq!(f.repo.count_items(f.user.id).unwrap(), 4);
    }

    #[test]
    fn test_delete_and_clear() {
        let f = fixture();
        let a = CartItem::new(f.user.id, f.product.id, "S".to_string(), String::new(), 1);
        let b = CartItem::new(f.user.id, f.product.id, "M".to_string(), String::new(), 2);
        f.repo.save_item(&a).unwrap();
        f.repo.save_item(&b).unwrap();

        f.repo.delete_item(a.id).unwrap();
        assert_eq!(f.repo.count_items(f.user.id).unwrap(), 2);

        f.repo.clear(f.user.id).unwrap();
        assert!(f.repo.list_lines(f.user.id).unwrap().is_empty());
        assert_eq!(f.repo.count_items(f.user.id).unwrap(), 0);
    }
}
