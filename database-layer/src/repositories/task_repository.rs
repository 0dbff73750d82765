//! Clinic task board repository

use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use crate::models::{Task, TaskInput};
use chrono::Utc;
use tracing::info;

const TASK_COLUMNS: &str = "id, content, completed, created_at";

#[derive(Clone)]
pub struct TaskRepository {
    pool: DatabasePool,
}

impl TaskRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, content: &str) -> DatabaseResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (content, completed, created_at) VALUES (?, 0, ?) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(content)
        .bind(Utc::now())
        .fetch_one(self.pool.pool())
        .await?;

        info!(task_id = task.id, "Task added");
        Ok(task)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(task)
    }

    /// Oldest first
    pub async fn list(&self) -> DatabaseResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at, id"
        ))
        .fetch_all(self.pool.pool())
        .await?;
        Ok(tasks)
    }

    pub async fn update(&self, id: i64, input: &TaskInput) -> DatabaseResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET content = ?, completed = ? WHERE id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(&input.content)
        .bind(input.completed)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(task)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
