use crate::config::ServerConfig;
use anyhow::Result;
use auth_identity::IdentityService;
use database_layer::Database;
use std::sync::Arc;
use tracing::info;

/// Shared request state: configuration, the store, and the identity service
#[derive(Clone)]
pub struct ClinicServer {
    pub config: Arc<ServerConfig>,
    pub db: Database,
    pub identity: Arc<IdentityService>,
}

impl ClinicServer {
    /// Connect to the configured store and wire up the services
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let db = Database::connect(&config.database_url, config.max_connections).await?;
        info!(database_url = %config.database_url, "Database ready");
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: ServerConfig, db: Database) -> Self {
        let identity = IdentityService::new(
            Arc::new(db.users.clone()),
            Arc::new(db.sessions.clone()),
            config.identity.clone(),
        );

        Self {
            config: Arc::new(config),
            db,
            identity: Arc::new(identity),
        }
    }
}
