// ABOUTME: User storage layer using SQLite
// ABOUTME: CRUD for role-tagged identity records consumed by the assignment engine

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use curbside_storage::{StorageError, StorageResult};

use crate::types::{Role, User, UserCreateInput, UserUpdateInput};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: UserCreateInput) -> StorageResult<User> {
        let id = curbside_core::user_id();
        let now = Utc::now();

        debug!("Creating user: {} ({})", id, input.role);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_user(&id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    pub async fn list_users(&self) -> StorageResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_user).collect()
    }

    pub async fn list_users_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users WHERE role = ? ORDER BY name")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_user).collect()
    }

    pub async fn update_user(&self, id: &str, input: UserUpdateInput) -> StorageResult<User> {
        debug!("Updating user: {}", id);

        let now = Utc::now();
        let mut updates = vec!["updated_at = ?"];

        if input.name.is_some() {
            updates.push("name = ?");
        }
        if input.email.is_some() {
            updates.push("email = ?");
        }
        if input.role.is_some() {
            updates.push("role = ?");
        }

        let query_str = format!("UPDATE users SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&query_str).bind(now);

        if let Some(name) = input.name {
            query = query.bind(name);
        }
        if let Some(email) = input.email {
            query = query.bind(email);
        }
        if let Some(role) = input.role {
            query = query.bind(role);
        }

        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn delete_user(&self, id: &str) -> StorageResult<()> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> StorageResult<User> {
    Ok(User {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        email: row.try_get("email").map_err(StorageError::Sqlx)?,
        role: row.try_get("role").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
