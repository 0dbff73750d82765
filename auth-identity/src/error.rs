use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Username already exists.")]
    UsernameAlreadyInUse,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please select a role.")]
    MissingRole,

    #[error("Username and password are required.")]
    MissingCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid session lifetime configuration")]
    InvalidSessionLifetime,

    #[error("Hashing error")]
    HashingError,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IdentityError {
    /// Whether the message is safe and meaningful to show on a form
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            IdentityError::InvalidCredentials
                | IdentityError::UsernameAlreadyInUse
                | IdentityError::PasswordMismatch
                | IdentityError::MissingRole
                | IdentityError::MissingCredentials
        )
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
