use crate::{error::*, models::*};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `UsernameAlreadyInUse` when the name is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<()>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>>;
    async fn delete_session(&self, token: &str) -> Result<()>;
    /// Remove every session that expired before `now`, returning how many were removed
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// In-memory user store for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.username == user.username) {
            return Err(IdentityError::UsernameAlreadyInUse);
        }
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            avatar: user.avatar,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory session store for development and testing
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<Vec<Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: &Session) -> Result<()> {
        self.sessions.write().push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.sessions.write().retain(|s| s.token != token);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
