//! Credential store for user records
//!
//! The store is a trait so handlers receive an explicitly constructed
//! handle rather than a process-wide client; tests run against the
//! in-memory implementation in [`crate::repositories::memory`].
//!
//! All access is read-then-write without locking. Concurrent
//! login/refresh/logout calls for the same user can race on the stored
//! refresh token; the last writer wins.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record as persisted
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub image: Option<String>,
    pub designation: Option<String>,
    /// Most recently issued refresh token; a newly issued token replaces
    /// the previous value, a logout clears it.
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub image: Option<String>,
    pub designation: Option<String>,
    pub refresh_token: Option<String>,
}

/// Tri-state profile patch: a `Some` field overwrites, a `None` field
/// retains the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub designation: Option<String>,
}

/// Persistence operations the session layer depends on
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails on a duplicate email
    async fn create(&self, user: NewUser) -> Result<UserRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Look up the user currently holding a refresh token
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<UserRecord>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Set or clear the stored refresh token; a no-op for unknown emails
    async fn set_refresh_token(&self, email: &str, token: Option<&str>) -> Result<()>;

    /// Replace the stored password hash; `None` if the user is absent
    async fn set_password_hash(&self, id: Uuid, password_hash: &str)
        -> Result<Option<UserRecord>>;

    /// Apply a profile patch; `None` if the user is absent
    async fn apply_patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<UserRecord>>;

    /// Delete a user record irrevocably
    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn list(&self) -> Result<Vec<UserRecord>>;
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, image, designation, refresh_token, created_at, updated_at";

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, image, designation, refresh_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(user.image)
        .bind(user.designation)
        .bind(user.refresh_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE refresh_token = $1",
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn set_refresh_token(&self, email: &str, token: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE email = $1")
            .bind(email)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn apply_patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                designation = COALESCE($4, designation),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.image)
        .bind(patch.designation)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
