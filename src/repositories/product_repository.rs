// src/repositories/product_repository.rs
//
// Catalog persistence

use std::sync::Arc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::product::{Product, ProductCategory};
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{json_col, parsed_col, timestamp_col, u32_col, uuid_col};

const PRODUCT_COLUMNS: &str = "id, name, description, category, brand, price_cents,
    discount_percent, image_url, sizes, colors, rating, stock, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
pub trait ProductRepository: Send + Sync {
    fn save(&self, product: &Product) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;
    fn list_all(&self) -> AppResult<Vec<Product>>;
    fn list_by_category(&self, category: ProductCategory) -> AppResult<Vec<Product>>;
    fn search(&self, query: &str) -> AppResult<Vec<Product>>;
    fn top_rated(&self, limit: u32) -> AppResult<Vec<Product>>;
    fn update_stock(&self, id: Uuid, stock: u32) -> AppResult<()>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
    fn count(&self) -> AppResult<u64>;
}

pub struct SqliteProductRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteProductRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Product - returns rusqlite::Error for query_map compatibility
    pub(crate) fn row_to_product(row: &Row) -> Result<Product, rusqlite::Error> {
        let discount: i64 = row.get("discount_percent")?;
        let rating: f64 = row.get("rating")?;

        Ok(Product {
            id: uuid_col(row, "id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            category: parsed_col(row, "category")?,
            brand: row.get("brand")?,
            price_cents: row.get("price_cents")?,
            discount_percent: discount.clamp(0, 100) as u8,
            image_url: row.get("image_url")?,
            sizes: json_col(row, "sizes")?,
            colors: json_col(row, "colors")?,
            rating: rating as f32,
            stock: u32_col(row, "stock")?,
            created_at: timestamp_col(row, "created_at")?,
            updated_at: timestamp_col(row, "updated_at")?,
        })
    }

    fn query_products(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<Product>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;

        let products: Vec<Product> = stmt
            .query_map(params, Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepository {
    fn save(&self, product: &Product) -> AppResult<()> {
        let conn = self.pool.get()?;

        let sizes_json = serde_json::to_string(&product.sizes)?;
        let colors_json = serde_json::to_string(&product.colors)?;

        // Upsert, not REPLACE: a REPLACE deletes the row and cascades into carts
        conn.execute(
            "INSERT INTO products (
                id, name, description, category, brand, price_cents,
                discount_percent, image_url, sizes, colors, rating, stock,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                brand = excluded.brand,
                price_cents = excluded.price_cents,
                discount_percent = excluded.discount_percent,
                image_url = excluded.image_url,
                sizes = excluded.sizes,
                colors = excluded.colors,
                rating = excluded.rating,
                stock = excluded.stock,
                updated_at = excluded.updated_at",
            params![
                product.id.to_string(),
                product.name,
                product.description,
                product.category.to_string(),
                product.brand,
                product.price_cents,
                i64::from(product.discount_percent),
                product.image_url,
                sizes_json,
                colors_json,
                f64::from(product.rating),
                i64::from(product.stock),
                product.created_at.to_rfc3339(),
                product.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_product) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Product>> {
        self.query_products(
            &format!("SELECT {} FROM products ORDER BY name", PRODUCT_COLUMNS),
            &[],
        )
    }

    fn list_by_category(&self, category: ProductCategory) -> AppResult<Vec<Product>> {
        self.query_products(
            &format!(
                "SELECT {} FROM products WHERE category = ?1 ORDER BY name",
                PRODUCT_COLUMNS
            ),
            &[&category.to_string()],
        )
    }

    fn search(&self, query: &str) -> AppResult<Vec<Product>> {
        let escaped = query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        self.query_products(
            &format!(
                "SELECT {} FROM products
                 WHERE name LIKE ?1 ESCAPE '\\'
                    OR brand LIKE ?1 ESCAPE '\\'
                    OR description LIKE ?1 ESCAPE '\\'
                 ORDER BY name",
                PRODUCT_COLUMNS
            ),
            &[&pattern],
        )
    }

    fn top_rated(&self, limit: u32) -> AppResult<Vec<Product>> {
        self.query_products(
            &format!(
                "SELECT {} FROM products ORDER BY rating DESC, name LIMIT ?1",
                PRODUCT_COLUMNS
            ),
            &[&i64::from(limit)],
        )
    }

    fn update_stock(&self, id: Uuid, stock: u32) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3",
            params![i64::from(stock), chrono::Utc::now().to_rfc3339(), id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn count(&self) -> AppResult<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;

    fn product(name: &str, category: ProductCategory, rating: f32) -> Product {
        let mut p = Product::new(name.to_string(), category, 2500);
        p.brand = "Northwind".to_string();
        p.sizes = vec!["S".to_string(), "M".to_string()];
        p.colors = vec!["Black".to_string()];
        p.rating = rating;
        p.stock = 5;
        p
    }

    #[test]
    fn test_save_and_get() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);

        let mut p = product("Wool Coat", ProductCategory::Women, 4.5);
        p.discount_percent = 20;
        p.image_url = Some("https://img.example/coat.png".to_string());
        repo.save(&p).unwrap();

        let loaded = repo.get_by_id(p.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Wool Coat");
        assert_eq!(loaded.sizes, vec!["S".to_string(), "M".to_string()]);
        assert_eq!(loaded.discount_percent, 20);
        assert_eq!(loaded.category, ProductCategory::Women);
        assert_eq!(loaded.image_url, p.image_url);
        assert_eq!(loaded.stock, 5);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);
        assert!(repo.get_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_list_by_category_and_order() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);

        repo.save(&product("Parka", ProductCategory::Men, 4.0)).unwrap();
        repo.save(&product("Chinos", ProductCategory::Men, 3.0)).unwrap();
        repo.save(&product("Sandals", ProductCategory::Footwear, 4.9)).unwrap();

        let men = repo.list_by_category(ProductCategory::Men).unwrap();
        let names: Vec<&str> = men.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chinos", "Parka"]);

        assert_eq!(repo.list_all().unwrap().len(), 3);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_and_escapes_wildcards() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);

        repo.save(&product("Running Shoe", ProductCategory::Footwear, 4.0)).unwrap();
        repo.save(&product("100% Cotton Tee", ProductCategory::Men, 4.0)).unwrap();

        assert_eq!(repo.search("running").unwrap().len(), 1);
        assert_eq!(repo.search("NORTHWIND").unwrap().len(), 2);
        assert_eq!(repo.search("100%").unwrap().len(), 1);
        assert_eq!(repo.search("%").unwrap().len(), 1);
    }

    #[test]
    fn test_top_rated() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);

        repo.save(&product("A", ProductCategory::Kids, 3.1)).unwrap();
        repo.save(&product("B", ProductCategory::Kids, 4.8)).unwrap();
        repo.save(&product("C", ProductCategory::Kids, 4.2)).unwrap();

        let top = repo.top_rated(2).unwrap();
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_update_stock_and_delete() {
        let (_dir, pool) = test_pool();
        let repo = SqliteProductRepository::new(pool);

        let p = product("Scarf", ProductCategory::Accessories, 4.0);
        repo.save(&p).unwrap();

        repo.update_stock(p.id, 42).unwrap();
        assert_eq!(repo.get_by_id(p.id).unwrap().unwrap().stock, 42);

        repo.delete(p.id).unwrap();
        assert!(matches!(repo.delete(p.id), Err(AppError::NotFound)));
        assert!(matches!(repo.update_stock(p.id, 1), Err(AppError::NotFound)));
    }
}
