use crate::{config::*, error::*, models::*, repository::*};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use rand::rngs::OsRng;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct IdentityService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    config: IdentityConfig,
    argon2: Argon2<'static>,
    /// Hash verified against when the username is unknown, so both login
    /// failures cost one Argon2 verification
    dummy_hash: OnceLock<Option<String>>,
}

impl IdentityService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        config: IdentityConfig,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
            argon2: Argon2::default(),
            dummy_hash: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Create an account.
    ///
    /// Checks run in a fixed order: required fields, role, password confirmation,
    /// then username uniqueness. Nothing is written unless all of them pass.
    pub async fn register_user(&self, request: SignupRequest) -> Result<User> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let role: Role = request.role.parse()?;

        if request.password != request.confirm_password {
            return Err(IdentityError::PasswordMismatch);
        }

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(IdentityError::UsernameAlreadyInUse);
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = self
            .user_repo
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                role,
                avatar: None,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "Account registered");
        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(user) = self.user_repo.find_by_username(username.trim()).await? else {
            debug!("Login attempt for unknown username");
            self.burn_verification(password);
            return Err(IdentityError::InvalidCredentials);
        };

        if let Err(e) = self.verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(e);
        }

        Ok(user)
    }

    /// Open a session for an authenticated user
    pub async fn create_session(&self, user_id: i64, remember: bool) -> Result<Session> {
        let now = Utc::now();
        let expires_at = self
            .config
            .session_lifetime(remember)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(IdentityError::InvalidSessionLifetime)?;

        let session = Session {
            token: Self::generate_session_token(),
            user_id,
            remember,
            expires_at,
            created_at: now,
        };

        self.session_repo.create_session(&session).await?;
        debug!(user_id, remember, "Session created");
        Ok(session)
    }

    /// Resolve a session token to its principal
    pub async fn validate_token(&self, token: &str) -> Result<User> {
        let session = self
            .session_repo
            .find_by_token(token)
            .await?
            .ok_or(IdentityError::InvalidToken)?;

        if session.is_expired_at(Utc::now()) {
            self.session_repo.delete_session(token).await?;
            return Err(IdentityError::SessionExpired);
        }

        self.user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.session_repo.delete_session(token).await
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let removed = self.session_repo.delete_expired_sessions(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| IdentityError::HashingError)?
            .to_string();
        Ok(password_hash)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::HashingError)?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| IdentityError::InvalidCredentials)
    }

    /// Run a verification that always fails, matching the cost of a wrong password
    fn burn_verification(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_init(|| self.hash_password("caredesk-unknown-user").ok());
        if let Some(hash) = dummy {
            let _ = self.verify_password(password, hash);
        }
    }

    fn generate_session_token() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemorySessionRepository, InMemoryUserRepository};
    use chrono::Duration;
    use std::time::Instant;

    fn service_with(sessions: Arc<InMemorySessionRepository>) -> IdentityService {
        IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            sessions,
            IdentityConfig::default(),
        )
    }

    fn service() -> IdentityService {
        service_with(Arc::new(InMemorySessionRepository::new()))
    }

    fn signup(username: &str, password: &str, confirm: &str, role: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_signup_succeeds_and_second_is_rejected() {
        let service = service();

        let user = service
            .register_user(signup("house", "vicodin", "vicodin", "doctor"))
            .await
            .unwrap();
        assert_eq!(user.username, "house");
        assert_eq!(user.role, Role::Doctor);
        assert_ne!(user.password_hash, "vicodin");

        let err = service
            .register_user(signup("house", "other", "other", "patient"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::UsernameAlreadyInUse));
    }

    #[tokio::test]
    async fn test_signup_rejects_mismatched_passwords() {
        let service = service();
        for (password, confirm) in [("a", "b"), ("secret", "secret "), ("x", "")] {
            let err = service
                .register_user(signup("wilson", password, confirm, "doctor"))
                .await
                .unwrap_err();
            assert!(matches!(err, IdentityError::PasswordMismatch));
        }
        // nothing was written, so the name is still free
        assert!(service
            .register_user(signup("wilson", "ok", "ok", "doctor"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_signup_requires_role() {
        let service = service();
        let err = service
            .register_user(signup("cuddy", "pw", "pw", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::MissingRole));
        assert!(err.is_user_facing());
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform() {
        let service = service();
        service
            .register_user(signup("chase", "surgery", "surgery", "doctor"))
            .await
            .unwrap();

        let unknown = service.authenticate("nobody", "surgery").await.unwrap_err();
        let wrong = service.authenticate("chase", "wrong").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, IdentityError::InvalidCredentials));

        let user = service.authenticate("chase", "surgery").await.unwrap();
        assert_eq!(user.username, "chase");
    }

    #[tokio::test]
    async fn test_unknown_user_costs_a_password_verification() {
        let service = service();
        service
            .register_user(signup("taub", "plastics", "plastics", "doctor"))
            .await
            .unwrap();

        // first miss also builds the dummy hash
        let _ = service.authenticate("ghost", "plastics").await;

        let started = Instant::now();
        let _ = service.authenticate("ghost", "plastics").await;
        let unknown = started.elapsed();

        let started = Instant::now();
        let _ = service.authenticate("taub", "wrong").await;
        let wrong = started.elapsed();

        assert!(service.dummy_hash.get().is_some_and(Option::is_some));
        assert!(
            unknown * 4 >= wrong,
            "unknown user took {unknown:?}, wrong password took {wrong:?}"
        );
    }

    #[tokio::test]
    async fn test_unusable_session_lifetime_is_an_error() {
        let service = IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            IdentityConfig {
                session_ttl_hours: -1,
                remember_me_days: 1_000_000_000_000,
            },
        );
        assert!(matches!(
            service.create_session(1, true).await,
            Err(IdentityError::InvalidSessionLifetime)
        ));
        assert!(matches!(
            service.create_session(1, false).await,
            Err(IdentityError::InvalidSessionLifetime)
        ));

        // representable as a duration but past the end of the calendar
        let far = IdentityService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            IdentityConfig {
                session_ttl_hours: 24,
                remember_me_days: 100_000_000_000,
            },
        );
        assert!(far.create_session(1, true).await.is_err());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let service = service_with(sessions.clone());
        let user = service
            .register_user(signup("foreman", "neuro", "neuro", "patient"))
            .await
            .unwrap();

        let short = service.create_session(user.id, false).await.unwrap();
        let long = service.create_session(user.id, true).await.unwrap();
        assert!(long.expires_at > short.expires_at);
        assert_ne!(short.token, long.token);

        let principal = service.validate_token(&short.token).await.unwrap();
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.role, Role::Patient);

        service.logout(&short.token).await.unwrap();
        assert!(matches!(
            service.validate_token(&short.token).await,
            Err(IdentityError::InvalidToken)
        ));
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let service = service_with(sessions.clone());
        let user = service
            .register_user(signup("cameron", "immuno", "immuno", "doctor"))
            .await
            .unwrap();

        let stale = Session {
            token: "stale".to_string(),
            user_id: user.id,
            remember: false,
            expires_at: Utc::now() - Duration::minutes(1),
            created_at: Utc::now() - Duration::hours(25),
        };
        sessions.create_session(&stale).await.unwrap();

        assert!(matches!(
            service.validate_token("stale").await,
            Err(IdentityError::SessionExpired)
        ));
        assert!(sessions.is_empty());
    }
}
