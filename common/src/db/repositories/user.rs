// User profile repository implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::db::repository::{Repository, UserStore};
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::UserProfile;

/// Repository for the `user_profiles` table
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<UserProfile> for UserRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, limit: i64, offset: i64) -> Result<Vec<UserProfile>, DatabaseError> {
        let users = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, user_name, password_hash, role, enabled
            FROM user_profiles
            ORDER BY user_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<UserProfile>, DatabaseError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, user_name, password_hash, role, enabled
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = user.user_id, user_name = %user.user_name))]
    async fn insert(&self, user: &UserProfile) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, user_name, password_hash, role, enabled)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.enabled)
        .execute(self.pool.pool())
        .await?;

        tracing::info!("User created");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = user.user_id))]
    async fn update(&self, user: &UserProfile) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET user_name = $2,
                password_hash = $3,
                role = $4,
                enabled = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.enabled)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user.user_id)));
        }

        tracing::info!("User updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, user_name: &str) -> Result<Option<UserProfile>, DatabaseError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, user_name, password_hash, role, enabled
            FROM user_profiles
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(user)
    }
}
