// src/repositories/user_repository.rs
//
// Accounts and login sessions

use std::sync::Arc;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::user::{Session, User};
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{timestamp_col, uuid_col};

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    fn save(&self, user: &User) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    fn email_exists(&self, email: &str) -> AppResult<bool>;
    fn save_session(&self, session: &Session) -> AppResult<()>;
    fn get_session(&self, token: &str) -> AppResult<Option<Session>>;
    fn delete_session(&self, token: &str) -> AppResult<()>;
    fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<usize>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: uuid_col(row, "id")?,
            email: row.get("email")?,
            display_name: row.get("display_name")?,
            password_hash: row.get("password_hash")?,
            salt: row.get("salt")?,
            created_at: timestamp_col(row, "created_at")?,
        })
    }

    fn row_to_session(row: &Row) -> Result<Session, rusqlite::Error> {
        Ok(Session {
            token: row.get("token")?,
            user_id: uuid_col(row, "user_id")?,
            created_at: timestamp_col(row, "created_at")?,
            expires_at: timestamp_col(row, "expires_at")?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn save(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO users (id, email, display_name, password_hash, salt, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name,
                password_hash = excluded.password_hash,
                salt = excluded.salt",
            params![
                user.id.to_string(),
                user.email,
                user.display_name,
                user.password_hash,
                user.salt,
                user.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, email, display_name, password_hash, salt, created_at
             FROM users WHERE id = ?1",
        )?;

        match stmt.query_row(params![id.to_string()], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        // email column is COLLATE NOCASE
        let mut stmt = conn.prepare(
            "SELECT id, email, display_name, password_hash, salt, created_at
             FROM users WHERE email = ?1",
        )?;

        match stmt.query_row(params![email.trim()], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn email_exists(&self, email: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email.trim()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn save_session(&self, session: &Session) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO sessions (token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id.to_string(),
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_session(&self, token: &str) -> AppResult<Option<Session>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
        )?;

        match stmt.query_row(params![token], Self::row_to_session) {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn delete_session(&self, token: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let conn = self.pool.get()?;

        // RFC 3339 UTC strings sort chronologically
        let removed = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![now.to_rfc3339()],
        )?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_pool;
    use chrono::Duration;

    fn user(email: &str) -> User {
        User::new(email.to_string(), "Ana".to_string(), "hash".to_string(), "salt".to_string())
    }

    #[test]
    fn test_save_and_lookup_by_email_ignores_case() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        let u = user("Ana@Example.com");
        repo.save(&u).unwrap();

        let loaded = repo.get_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(loaded.id, u.id);
        assert!(repo.email_exists("ANA@EXAMPLE.COM").unwrap());
        assert!(!repo.email_exists("bob@example.com").unwrap());
        assert_eq!(repo.get_by_id(u.id).unwrap().unwrap().password_hash, "hash");
    }

    #[test]
    fn test_duplicate_email_rejected_by_schema() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        repo.save(&user("ana@example.com")).unwrap();
        let result = repo.save(&user("ANA@example.com"));

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[test]
    fn test_save_existing_user_updates_in_place() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        let mut u = user("ana@example.com");
        repo.save(&u).unwrap();
        let session = Session::new(u.id, Duration::hours(1));
        repo.save_session(&session).unwrap();

        u.display_name = "Ana S.".to_string();
        repo.save(&u).unwrap();

        assert_eq!(repo.get_by_id(u.id).unwrap().unwrap().display_name, "Ana S.");
        // The update must not cascade-delete the user's sessions
        assert!(repo.get_session(&session.token).unwrap().is_some());
    }

    #[test]
    fn test_session_lifecycle() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        let u = user("ana@example.com");
        repo.save(&u).unwrap();

        let session = Session::new(u.id, Duration::hours(1));
        repo.save_session(&session).unwrap();

        let loaded = repo.get_session(&session.token).unwrap().unwrap();
        assert_eq!(loaded.user_id, u.id);

        repo.delete_session(&session.token).unwrap();
        assert!(repo.get_session(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_delete_expired_sessions() {
        let (_dir, pool) = test_pool();
        let repo = SqliteUserRepository::new(pool);

        let u = user("ana@example.com");
        repo.save(&u).unwrap();

        let live = Session::new(u.id, Duration::hours(5));
        let stale = Session::new(u.id, Duration::hours(-1));
        repo.save_session(&live).unwrap();
        repo.save_session(&stale).unwrap();

        let removed = repo.delete_expired_sessions(Utc::now()).unwrap();
        assert_eq!(removed, 1);
        assert!(repo.get_session(&live.token).unwrap().is_some());
        assert!(repo.get_session(&stale.token).unwrap().is_none());
    }
}
