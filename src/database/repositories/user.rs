use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::user::{TokenRecord, TokenUpdate};

/// 令牌持久化存储
///
/// 以邮箱为唯一键读写令牌记录。
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<TokenRecord>, sqlx::Error>;

    /// 按邮箱更新令牌字段，记录不存在时不做任何事
    async fn update_by_email(&self, email: &str, update: TokenUpdate) -> Result<(), sqlx::Error>;

    /// 授权码回调写入令牌，记录不存在时插入
    async fn upsert_tokens(
        &self,
        email: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), sqlx::Error>;
}

/// PostgreSQL 令牌存储
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<TokenRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, TokenRecord>(
            r#"
            SELECT email, token, refresh_token, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_by_email(&self, email: &str, update: TokenUpdate) -> Result<(), sqlx::Error> {
        if update.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET updated_at = NOW()");
        if let Some(token) = update.access_token {
            query.push(", token = ").push_bind(token);
        }
        if let Some(refresh_token) = update.refresh_token {
            query.push(", refresh_token = ").push_bind(refresh_token);
        }
        query.push(" WHERE email = ").push_bind(email);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            tracing::warn!("No token record to update for {}", email);
        }

        Ok(())
    }

    async fn upsert_tokens(
        &self,
        email: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        // 授权码交换可能不返回新的刷新令牌，此时保留原值
        sqlx::query(
            r#"
            INSERT INTO users (email, token, refresh_token)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET token = EXCLUDED.token,
                refresh_token = COALESCE(EXCLUDED.refresh_token, users.refresh_token),
                updated_at = NOW()
            "#,
        )
        .bind(email)
        .bind(access_token)
        .bind(refresh_token)
        .execute(&self.pool)
        .await?;

        tracing::info!("Stored tokens for {}", email);
        Ok(())
    }
}
