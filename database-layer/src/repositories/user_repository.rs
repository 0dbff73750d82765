//! SQLite-backed account storage for the identity service

use crate::connection::DatabasePool;
use async_trait::async_trait;
use auth_identity::{IdentityError, NewUser, Result, User, UserRepository};
use chrono::Utc;

const USER_COLUMNS: &str = "id, username, password_hash, role, avatar, created_at";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash, role, avatar, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.avatar)
        .bind(Utc::now())
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                IdentityError::UsernameAlreadyInUse
            } else {
                IdentityError::DatabaseError(e)
            }
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use auth_identity::Role;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role,
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::in_memory().await.unwrap();

        let created = db.users.create_user(new_user("kutner", Role::Doctor)).await.unwrap();
        assert_eq!(created.role, Role::Doctor);
        assert!(created.avatar.is_none());

        let by_name = db.users.find_by_username("kutner").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_id = db.users.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "kutner");
        assert!(db.users.find_by_username("taub").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_maps_to_identity_error() {
        let db = Database::in_memory().await.unwrap();
        db.users.create_user(new_user("thirteen", Role::Doctor)).await.unwrap();

        let err = db
            .users
            .create_user(new_user("thirteen", Role::Patient))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::UsernameAlreadyInUse));
    }
}
