// src/repositories/order_repository.rs
//
// Orders, order items and the tracking log.
//
// place_order / update_status / cancel are the only multi-table writes in
// the crate; each runs in a single transaction so an order never exists
// without its items, tracking rows and stock movement.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row, Transaction};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::order::{Order, OrderItem, OrderStatus};
use crate::domain::tracking::TrackingRow;
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{json_col, parsed_col, timestamp_col, u32_col, uuid_col};

const ORDER_COLUMNS: &str = "id, user_id, status, address, payment, subtotal_cents,
    shipping_cents, total_cents, placed_at, updated_at";

const TRACKING_SELECT: &str = "SELECT t.order_id, t.product_id, t.size, t.color, t.status,
        t.recorded_at, i.product_name, i.quantity, p.image_url
     FROM order_tracking t
     JOIN orders o ON o.id = t.order_id
     JOIN order_items i
       ON i.order_id = t.order_id
      AND i.product_id = t.product_id
      AND i.size = t.size
      AND i.color = t.color
     LEFT JOIN products p ON p.id = t.product_id";

#[cfg_attr(test, mockall::automock)]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order atomically: order, items, initial tracking rows,
    /// stock decrement and removal of the ordered cart lines.
    fn place_order(&self, order: &Order, items: &[OrderItem]) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;
    fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;
    fn list_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;
    /// Fails with `InvalidStateTransition` unless the stored status may move to `status`
    fn update_status(&self, order_id: Uuid, status: OrderStatus, at: DateTime<Utc>) -> AppResult<()>;
    /// Mark cancelled, log a cancelled tracking row per item and restock
    fn cancel(&self, order_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
    fn tracking_rows(&self, order_id: Uuid) -> AppResult<Vec<TrackingRow>>;
    fn tracking_rows_for_user(&self, user_id: Uuid) -> AppResult<Vec<TrackingRow>>;
}

pub struct SqliteOrderRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteOrderRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &Row) -> Result<Order, rusqlite::Error> {
        Ok(Order {
            id: uuid_col(row, "id")?,
            user_id: uuid_col(row, "user_id")?,
            status: parsed_col(row, "status")?,
            address: json_col(row, "address")?,
            payment: json_col(row, "payment")?,
            subtotal_cents: row.get("subtotal_cents")?,
            shipping_cents: row.get("shipping_cents")?,
            total_cents: row.get("total_cents")?,
            placed_at: timestamp_col(row, "placed_at")?,
            updated_at: timestamp_col(row, "updated_at")?,
        })
    }

    fn row_to_item(row: &Row) -> Result<OrderItem, rusqlite::Error> {
        Ok(OrderItem {
            id: uuid_col(row, "id")?,
            order_id: uuid_col(row, "order_id")?,
            product_id: uuid_col(row, "product_id")?,
            product_name: row.get("product_name")?,
            size: row.get("size")?,
            color: row.get("color")?,
            quantity: u32_col(row, "quantity")?,
            unit_price_cents: row.get("unit_price_cents")?,
        })
    }

    fn row_to_tracking(row: &Row) -> Result<TrackingRow, rusqlite::Error> {
        Ok(TrackingRow {
            order_id: uuid_col(row, "order_id")?,
            product_id: uuid_col(row, "product_id")?,
            product_name: row.get("product_name")?,
            image_url: row.get("image_url")?,
            size: row.get("size")?,
            color: row.get("color")?,
            quantity: u32_col(row, "quantity")?,
            status: row.get("status")?,
            recorded_at: timestamp_col(row, "recorded_at")?,
        })
    }

    /// One tracking row per order line
    fn insert_tracking_rows(
        tx: &Transaction,
        order_id: Uuid,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> AppResult<usize> {
        let inserted = {
            let mut items = tx.prepare(
                "SELECT product_id, size, color FROM order_items WHERE order_id = ?1",
            )?;
            let keys = items
                .query_map(params![order_id.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut insert = tx.prepare(
                "INSERT INTO order_tracking (id, order_id, product_id, size, color, status, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (product_id, size, color) in &keys {
                insert.execute(params![
                    Uuid::new_v4().to_string(),
                    order_id.to_string(),
                    product_id,
                    size,
                    color,
                    status.as_str(),
                    at.to_rfc3339(),
                ])?;
            }
            keys.len()
        };

        Ok(inserted)
    }

    /// Compare-and-set on the order status. Only rows currently in a state
    /// that may move to `status` are touched, so two racing writers cannot
    /// both apply the same transition.
    fn set_order_status(
        tx: &Transaction,
        order_id: Uuid,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let sources: Vec<String> = OrderStatus::ALL
            .iter()
            .filter(|from| from.can_transition_to(status))
            .map(|from| format!("'{}'", from.as_str()))
            .collect();

        let rows_affected = if sources.is_empty() {
            0
        } else {
            tx.execute(
                &format!(
                    "UPDATE orders SET status = ?1, updated_at = ?2
                     WHERE id = ?3 AND status IN ({})",
                    sources.join(", ")
                ),
                params![status.as_str(), at.to_rfc3339(), order_id.to_string()],
            )?
        };

        if rows_affected == 0 {
            let current: Option<String> = tx
                .query_row(
                    "SELECT status FROM orders WHERE id = ?1",
                    params![order_id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;

            return match current {
                None => Err(AppError::NotFound),
                Some(current) => Err(AppError::Domain(DomainError::InvalidStateTransition(
                    format!("Order {} cannot move from {} to {}", order_id, current, status),
                ))),
            };
        }

        Ok(())
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn place_order(&self, order: &Order, items: &[OrderItem]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO orders (
                id, user_id, status, address, payment, subtotal_cents,
                shipping_cents, total_cents, placed_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                order.id.to_string(),
                order.user_id.to_string(),
                order.status.as_str(),
                serde_json::to_string(&order.address)?,
                serde_json::to_string(&order.payment)?,
                order.subtotal_cents,
                order.shipping_cents,
                order.total_cents,
                order.placed_at.to_rfc3339(),
                order.updated_at.to_rfc3339(),
            ],
        )?;

        {
            let mut insert_item = tx.prepare(
                "INSERT INTO order_items (
                    id, order_id, product_id, product_name, size, color, quantity, unit_price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            let mut take_stock = tx.prepare(
                "UPDATE products SET stock = stock - ?1, updated_at = ?2
                 WHERE id = ?3 AND stock >= ?1",
            )?;

            for item in items {
                insert_item.execute(params![
                    item.id.to_string(),
                    order.id.to_string(),
                    item.product_id.to_string(),
                    item.product_name,
                    item.size,
                    item.color,
                    i64::from(item.quantity),
                    item.unit_price_cents,
                ])?;

                let updated = take_stock.execute(params![
                    i64::from(item.quantity),
                    order.placed_at.to_rfc3339(),
                    item.product_id.to_string(),
                ])?;

                if updated == 0 {
                    let available: Option<i64> = tx
                        .query_row(
                            "SELECT stock FROM products WHERE id = ?1",
                            params![item.product_id.to_string()],
                            |row| row.get(0),
                        )
                        .optional()?;

                    // Dropping the transaction rolls everything back
                    return Err(AppError::Domain(DomainError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                        available: available.unwrap_or(0).max(0) as u32,
                    }));
                }
            }
        }

        Self::insert_tracking_rows(&tx, order.id, OrderStatus::Placed, order.placed_at)?;

        {
            // Only the ordered lines leave the cart; anything added since the
            // checkout snapshot stays
            let mut remove_line = tx.prepare(
                "DELETE FROM cart_items
                 WHERE user_id = ?1 AND product_id = ?2 AND size = ?3 AND color = ?4",
            )?;
            for item in items {
                remove_line.execute(params![
                    order.user_id.to_string(),
                    item.product_id.to_string(),
                    item.size,
                    item.color,
                ])?;
            }
        }

        tx.commit()?;

        log::info!(
            "Order {} placed by {} ({} items, {} cents)",
            order.id,
            order.user_id,
            items.len(),
            order.total_cents
        );

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let conn = self.pool.get()?;

        let order = conn
            .query_row(
                &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                params![id.to_string()],
                Self::row_to_order,
            )
            .optional()?;

        Ok(order)
    }

    fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY placed_at DESC",
            ORDER_COLUMNS
        ))?;

        let orders = stmt
            .query_map(params![user_id.to_string()], Self::row_to_order)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(orders)
    }

    fn list_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, order_id, product_id, product_name, size, color, quantity, unit_price_cents
             FROM order_items WHERE order_id = ?1
             ORDER BY rowid",
        )?;

        let items = stmt
            .query_map(params![order_id.to_string()], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn update_status(&self, order_id: Uuid, status: OrderStatus, at: DateTime<Utc>) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        Self::set_order_status(&tx, order_id, status, at)?;
        Self::insert_tracking_rows(&tx, order_id, status, at)?;

        tx.commit()?;
        Ok(())
    }

    fn cancel(&self, order_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        Self::set_order_status(&tx, order_id, OrderStatus::Cancelled, at)?;
        Self::insert_tracking_rows(&tx, order_id, OrderStatus::Cancelled, at)?;

        tx.execute(
            "UPDATE products
             SET stock = stock + (
                     SELECT SUM(i.quantity) FROM order_items i
                     WHERE i.order_id = ?1 AND i.product_id = products.id
                 ),
                 updated_at = ?2
             WHERE id IN (SELECT product_id FROM order_items WHERE order_id = ?1)",
            params![order_id.to_string(), at.to_rfc3339()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn tracking_rows(&self, order_id: Uuid) -> AppResult<Vec<TrackingRow>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE t.order_id = ?1 ORDER BY t.recorded_at, i.rowid",
            TRACKING_SELECT
        ))?;

        let rows = stmt
            .query_map(params![order_id.to_string()], Self::row_to_tracking)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn tracking_rows_for_user(&self, user_id: Uuid) -> AppResult<Vec<TrackingRow>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE o.user_id = ?1 ORDER BY o.placed_at DESC, t.order_id, t.recorded_at, i.rowid",
            TRACKING_SELECT
        ))?;

        let rows = stmt
            .query_map(params![user_id.to_string()], Self::row_to_tracking)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
