// src/services/auth_service.rs
//
// Registration, login and session lookup.
//
// Passwords are stored as hex SHA-256 over a per-user random salt followed
// by the password. Sessions are opaque tokens with an expiry.

use crate::domain::user::{validate_email, validate_password, validate_user, Session, User};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, UserLoggedIn, UserRegistered};
use crate::repositories::UserRepository;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<EventBus>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, event_bus: Arc<EventBus>, session_ttl: Duration) -> Self {
        Self {
            user_repo,
            event_bus,
            session_ttl,
        }
    }

    pub fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&request.password)?;

        if self.user_repo.email_exists(&email)? {
            return Err(AppError::Validation(format!("Email {} is already registered", email)));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&salt, &request.password);
        let user = User::new(email, request.display_name.trim().to_string(), password_hash, salt);

        validate_user(&user)?;
        self.user_repo.save(&user)?;

        self.event_bus.emit(UserRegistered::new(user.id, user.email.clone()));
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let user = self
            .user_repo
            .get_by_email(email.trim())?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if hash_password(&user.salt, password) != user.password_hash {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let session = Session::new(user.id, self.session_ttl);
        self.user_repo.save_session(&session)?;

        self.event_bus.emit(UserLoggedIn::new(user.id));
        Ok(session)
    }

    /// Resolve a session token to its user. Expired sessions are removed.
    pub fn current_user(&self, token: &str) -> AppResult<User> {
        let session = self
            .user_repo
            .get_session(token)?
            .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;

        if session.is_expired(Utc::now()) {
            self.user_repo.delete_session(token)?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        self.user_repo
            .get_by_id(session.user_id)?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }

    pub fn find_user_by_email(&self, email: &str) -> AppResult<User> {
        self.user_repo
            .get_by_email(email.trim())?
            .ok_or(AppError::NotFound)
    }

    pub fn logout(&self, token: &str) -> AppResult<()> {
        self.user_repo.delete_session(token)
    }

    pub fn purge_expired_sessions(&self) -> AppResult<usize> {
        let removed = self.user_repo.delete_expired_sessions(Utc::now())?;
        if removed > 0 {
            log::info!("Removed {} expired sessions", removed);
        }
        Ok(removed)
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;

    fn service(repo: MockUserRepository, bus: Arc<EventBus>) -> AuthService {
        AuthService::new(Arc::new(repo), bus, Duration::hours(1))
    }

    fn stored_user(password: &str) -> User {
        let salt = "fixed-salt".to_string();
        User::new(
            "ana@example.com".to_string(),
            "Ana".to_string(),
            hash_password(&salt, password),
            salt,
        )
    }

    #[test]
    fn test_register_hashes_and_emits() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_save()
            .withf(|user: &User| user.password_hash != "secret123" && user.email == "ana@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let bus = Arc::new(EventBus::new());
        let user = service(repo, bus.clone())
            .register(RegisterRequest {
                email: " Ana@Example.com ".to_string(),
                display_name: "Ana".to_string(),
                password: "secret123".to_string(),
            })
            .unwrap();

        assert_eq!(user.password_hash, hash_password(&user.salt, "secret123"));
        assert_eq!(bus.get_event_log()[0].event_type, "UserRegistered");
    }

    #[test]
    fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(true));
        repo.expect_save().never();

        let result = service(repo, Arc::new(EventBus::new())).register(RegisterRequest {
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            password: "secret123".to_string(),
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_register_weak_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().never();

        let result = service(repo, Arc::new(EventBus::new())).register(RegisterRequest {
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            password: "short".to_string(),
        });
        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_login_success_creates_session() {
        let mut repo = MockUserRepository::new();
        let user = stored_user("secret123");
        let user_id = user.id;
        repo.expect_get_by_email().returning(move |_| Ok(Some(user.clone())));
        repo.expect_save_session()
            .withf(move |s: &Session| s.user_id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let session = service(repo, Arc::new(EventBus::new()))
            .login("ana@example.com", "secret123")
            .unwrap();
        assert_eq!(session.user_id, user_id);
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_login_wrong_password() {
        let mut repo = MockUserRepository::new();
        let user = stored_user("secret123");
        repo.expect_get_by_email().returning(move |_| Ok(Some(user.clone())));
        repo.expect_save_session().never();

        let result = service(repo, Arc::new(EventBus::new())).login("ana@example.com", "wrong123");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_session_is_removed() {
        let mut repo = MockUserRepository::new();
        let mut session = Session::new(Uuid::new_v4(), Duration::hours(1));
        session.expires_at = Utc::now() - Duration::minutes(1);
        let token = session.token.clone();

        repo.expect_get_session().returning(move |_| Ok(Some(session.clone())));
        repo.expect_delete_session()
            .withf(move |t: &str| t == token)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_get_by_id().never();

        let result = service(repo, Arc::new(EventBus::new())).current_user("whatever");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
