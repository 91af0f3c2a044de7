use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, RepoError, RepoResult, User, UserCredentials};

/// Durable storage for users. Every read and write except `create` only sees
/// live rows (`deleted_at IS NULL`).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; `Conflict` if the email belongs to a live row.
    async fn create(&self, user: NewUser, password_hash: &str) -> RepoResult<User>;

    async fn get_by_id(&self, id: Uuid) -> RepoResult<User>;

    async fn get_by_email(&self, email: &str) -> RepoResult<UserCredentials>;

    /// Rewrite name and email, refreshing `updated_at`.
    async fn update(&self, id: Uuid, user: &User) -> RepoResult<User>;

    /// Soft delete: stamps `deleted_at` and `updated_at`.
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Live users, newest first.
    async fn list(&self) -> RepoResult<Vec<User>>;
}

const UNIQUE_VIOLATION: &str = "23505";

const USER_COLUMNS: &str = "id, name, email, is_active, created_at, updated_at, deleted_at";

fn map_write_error(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepoError::Conflict;
        }
    }
    RepoError::Database(err)
}

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser, password_hash: &str) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<UserCredentials> {
        sqlx::query_as::<_, UserCredentials>(&format!(
            r#"
            SELECT {USER_COLUMNS}, password_hash
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: Uuid, user: &User) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $1, email = $2, updated_at = now()
            WHERE id = $3 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
