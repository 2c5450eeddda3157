use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Find a user by (already normalised) email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a user unless the email is taken. `None` means another record
    /// already owns the email; the check and the insert are one statement.
    async fn insert_if_absent(&self, user: NewUser) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_if_absent(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
