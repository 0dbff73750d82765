// Transaction management
use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{Sqlite, Transaction};
use tracing::debug;

/// Hands out transactions on the shared pool. Every multi-statement write goes
/// through one so it is applied all-or-nothing.
pub struct TransactionManager {
    pool: DatabasePool,
    label: &'static str,
}

impl TransactionManager {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            label: "unnamed",
        }
    }

    /// Name the unit of work in debug logs
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Begin a new transaction
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Sqlite>> {
        debug!(label = self.label, "Beginning transaction");

        self.pool
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to begin transaction: {e}")))
    }
}
