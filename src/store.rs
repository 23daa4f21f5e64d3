//! Account Store
//!
//! Postgres-backed persistence for user records. Uniqueness of email and
//! username is enforced by the database, so concurrent duplicate
//! registrations resolve to exactly one success regardless of request
//! interleaving.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{NewUser, User};

/// User persistence over a Postgres pool
#[derive(Clone)]
pub struct UserStore {
    db: PgPool,
}

impl UserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the role enum, users table, and unique indexes
    pub async fn run_migrations(&self) -> Result<(), ApiError> {
        tracing::info!("Running database migrations");

        sqlx::query(
            r#"
            DO $$ BEGIN
                CREATE TYPE user_role AS ENUM ('student', 'teacher', 'admin');
            EXCEPTION
                WHEN duplicate_object THEN null;
            END $$;
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username VARCHAR(50) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                full_name VARCHAR(255),
                password_hash VARCHAR(255) NOT NULL,
                role user_role NOT NULL DEFAULT 'student',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                qr_code TEXT
            );
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);")
            .execute(&self.db)
            .await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Insert a new user, failing with `DuplicateAccount` when email or
    /// username is already taken
    pub async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateAccount,
            _ => e.into(),
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(users)
    }

    /// Attach a rendered QR artifact to a user row
    pub async fn attach_qr(&self, id: Uuid, qr_code: &str) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET qr_code = $1 WHERE id = $2")
            .bind(qr_code)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Delete a user row, returning whether it existed
    pub async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Database connectivity check
    pub async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
