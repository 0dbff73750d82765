use thiserror::Error;

/// Process-level failures of the CareDesk server
#[derive(Error, Debug)]
pub enum CareDeskError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database setup errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CareDeskError {
    /// Short machine-readable category, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            CareDeskError::NetworkError(_) => "network",
            CareDeskError::ServerError(_) => "server",
            CareDeskError::DatabaseError(_) => "database",
            CareDeskError::ConfigError(_) => "config",
            CareDeskError::Other(_) => "other",
        }
    }
}

/// Result type alias for CareDesk operations
pub type Result<T> = std::result::Result<T, CareDeskError>;

/// Log a fatal error with its category before the process exits
pub fn log_error(context: &str, error: &CareDeskError) {
    tracing::error!(
        context = context,
        error_type = error.error_type(),
        error = %error,
        "CareDesk error occurred"
    );
}
