use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::contact::repo_types::{Message, NewMessage};

#[async_trait]
pub trait MessageRepo: Send + Sync {
    async fn insert(&self, message: NewMessage) -> anyhow::Result<Message>;
}

#[derive(Clone)]
pub struct PgMessageRepo {
    db: PgPool,
}

impl PgMessageRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepo for PgMessageRepo {
    async fn insert(&self, message: NewMessage) -> anyhow::Result<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .fetch_one(&self.db)
        .await
        .context("insert message")
    }
}
