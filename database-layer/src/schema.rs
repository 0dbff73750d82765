//! Table definitions. Every statement is idempotent so startup can always run them.

use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::transaction::TransactionManager;
use tracing::info;

const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL,
        role          TEXT    NOT NULL CHECK (role IN ('doctor', 'patient')),
        avatar        BLOB,
        created_at    TEXT    NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        token      TEXT    PRIMARY KEY,
        user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        remember   INTEGER NOT NULL DEFAULT 0,
        expires_at TEXT    NOT NULL,
        created_at TEXT    NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS patients (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT    NOT NULL,
        age        INTEGER NOT NULL,
        gender     TEXT    NOT NULL,
        visit_date TEXT    NOT NULL,
        user_id    INTEGER REFERENCES users(id) ON DELETE SET NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS prescriptions (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id   INTEGER NOT NULL REFERENCES patients(id),
        medication   TEXT    NOT NULL,
        dosage       TEXT    NOT NULL,
        instructions TEXT    NOT NULL DEFAULT ''
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS telehealth_appointments (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id   INTEGER NOT NULL REFERENCES patients(id),
        scheduled_at TEXT    NOT NULL,
        provider     TEXT    NOT NULL,
        status       TEXT    NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS lab_orders (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id INTEGER NOT NULL REFERENCES patients(id),
        order_type TEXT    NOT NULL,
        ordered_by TEXT    NOT NULL,
        status     TEXT    NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS tasks (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        content    TEXT    NOT NULL,
        completed  INTEGER NOT NULL DEFAULT 0,
        created_at TEXT    NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_patients_user ON patients(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON telehealth_appointments(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_orders_patient ON lab_orders(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_lab_orders_status ON lab_orders(status)",
];

pub async fn run_migrations(pool: &DatabasePool) -> DatabaseResult<()> {
    let mut tx = TransactionManager::new(pool.clone())
        .with_label("migrations")
        .begin()
        .await?;

    for statement in MIGRATIONS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    info!(statements = MIGRATIONS.len(), "Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = DatabasePool::in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "lab_orders",
                "patients",
                "prescriptions",
                "sessions",
                "tasks",
                "telehealth_appointments",
                "users"
            ]
        );
    }

    #[tokio::test]
    async fn test_role_check_constraint() {
        let pool = DatabasePool::in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES ('x', 'h', 'admin', '2024-01-01')",
        )
        .execute(pool.pool())
        .await;
        assert!(result.is_err());
    }
}
