// src/repositories/notification_repository.rs

use std::sync::Arc;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::notification::Notification;
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{opt_uuid_col, parsed_col, timestamp_col, uuid_col};

#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    fn save(&self, notification: &Notification) -> AppResult<()>;
    fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;
    fn unread_count(&self, user_id: Uuid) -> AppResult<u32>;
    fn mark_read(&self, id: Uuid) -> AppResult<()>;
    /// Returns the number of notifications flipped to read
    fn mark_all_read(&self, user_id: Uuid) -> AppResult<usize>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<usize>;
}

pub struct SqliteNotificationRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteNotificationRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: &Row) -> Result<Notification, rusqlite::Error> {
        Ok(Notification {
            id: uuid_col(row, "id")?,
            user_id: uuid_col(row, "user_id")?,
            kind: parsed_col(row, "kind")?,
            title: row.get("title")?,
            body: row.get("body")?,
            order_id: opt_uuid_col(row, "order_id")?,
            read: row.get::<_, i64>("is_read")? != 0,
            created_at: timestamp_col(row, "created_at")?,
        })
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    fn save(&self, notification: &Notification) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO notifications (id, user_id, kind, title, body, order_id, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                is_read = excluded.is_read",
            params![
                notification.id.to_string(),
                notification.user_id.to_string(),
                notification.kind.to_string(),
                notification.title,
                notification.body,
                notification.order_id.map(|id| id.to_string()),
                notification.read as i64,
                notification.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, kind, title, body, order_id, is_read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let notifications = stmt
            .query_map(params![user_id.to_string()], Self::row_to_notification)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    fn unread_count(&self, user_id: Uuid) -> AppResult<u32> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count as u32)
    }

    fn mark_read(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn mark_all_read(&self, user_id: Uuid) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let updated = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            params![user_id.to_string()],
        )?;

        Ok(updated)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "DELETE FROM notifications WHERE id = ?1",
            params![id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let deleted = conn.execute(
            "DELETE FROM notifications WHERE created_at < ?1",
            params![cutoff.to_rfc3339()],
        )?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;
    use crate::domain::{NotificationKind, User};
    use crate::repositories::{SqliteUserRepository, UserRepository};
    use chrono::Duration;

    fn setup() -> (tempfile::TempDir, SqliteNotificationRepository, Uuid) {
        let (dir, pool) = test_pool();
        let user = User::new("ana@example.com".to_string(), "Ana".to_string(), "h".to_string(), "s".to_string());
        SqliteUserRepository::new(pool.clone()).save(&user).unwrap();
        (dir, SqliteNotificationRepository::new(pool), user.id)
    }

    fn note(user_id: Uuid, title: &str) -> Notification {
        Notification::new(user_id, NotificationKind::System, title.to_string(), String::new())
    }

    #[test]
    fn test_unread_and_mark_read() {
        let (_dir, repo, user_id) = setup();
        let first = note(user_id, "Welcome");
        let order_id = Uuid::new_v4();
        let second = Notification::for_order(user_id, order_id, "Shipped".to_string(), String::new());
        repo.save(&first).unwrap();
        repo.save(&second).unwrap();

        assert_eq!(repo.unread_count(user_id).unwrap(), 2);

        repo.mark_read(first.id).unwrap();
        assert_eq!(repo.unread_count(user_id).unwrap(), 1);

        assert_eq!(repo.mark_all_read(user_id).unwrap(), 1);
        assert_eq!(repo.unread_count(user_id).unwrap(), 0);

        let listed = repo.list_by_user(user_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|n| n.read));
        assert!(listed.iter().any(|n| n.order_id == Some(order_id)));
    }

    #[test]
    fn test_list_newest_first() {
        let (_dir, repo, user_id) = setup();
        let mut old = note(user_id, "Old");
        old.created_at = Utc::now() - Duration::days(1);
        let new = note(user_id, "New");
        repo.save(&old).unwrap();
        repo.save(&new).unwrap();

        let titles: Vec<String> = repo.list_by_user(user_id).unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["New".to_string(), "Old".to_string()]);
    }

    #[test]
    fn test_delete_and_prune() {
        let (_dir, repo, user_id) = setup();
        let mut stale = note(user_id, "Stale");
        stale.created_at = Utc::now() - Duration::days(200);
        let fresh = note(user_id, "Fresh");
        repo.save(&stale).unwrap();
        repo.save(&fresh).unwrap();

        assert_eq!(repo.delete_older_than(Utc::now() - Duration::days(90)).unwrap(), 1);

        repo.delete(fresh.id).unwrap();
        assert!(repo.list_by_user(user_id).unwrap().is_empty());
        assert!(matches!(repo.delete(fresh.id), Err(AppError::NotFound)));
        assert!(matches!(repo.mark_read(fresh.id), Err(AppError::NotFound)));
    }
}
