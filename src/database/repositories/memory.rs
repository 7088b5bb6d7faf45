use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::database::models::user::{TokenRecord, TokenUpdate};

/// 进程内令牌存储，用于本地调试和测试
#[derive(Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<String, TokenRecord>>,
    reads: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一条令牌记录
    pub async fn insert(&self, email: &str, access_token: Option<&str>, refresh_token: Option<&str>) {
        self.records.write().await.insert(
            email.to_string(),
            TokenRecord {
                email: email.to_string(),
                access_token: access_token.map(str::to_string),
                refresh_token: refresh_token.map(str::to_string),
                updated_at: chrono::Utc::now(),
            },
        );
    }

    pub async fn get(&self, email: &str) -> Option<TokenRecord> {
        self.records.read().await.get(email).cloned()
    }

    /// `find_by_email` 被调用的次数
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<TokenRecord>, sqlx::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(email).await)
    }

    async fn update_by_email(&self, email: &str, update: TokenUpdate) -> Result<(), sqlx::Error> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(email) {
            if let Some(token) = update.access_token {
                record.access_token = token;
            }
            if let Some(refresh_token) = update.refresh_token {
                record.refresh_token = refresh_token;
            }
            record.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn upsert_tokens(
        &self,
        email: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut records = self.records.write().await;
        let record = records
            .entry(email.to_string())
            .or_insert_with(|| TokenRecord {
                email: email.to_string(),
                access_token: None,
                refresh_token: None,
                updated_at: chrono::Utc::now(),
            });
        record.access_token = Some(access_token.to_string());
        if let Some(refresh_token) = refresh_token {
            record.refresh_token = Some(refresh_token.to_string());
        }
        record.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_only_touches_requested_columns() {
        let store = MemoryTokenStore::new();
        store.insert("me@example.com", Some("old"), Some("rt")).await;

        store
            .update_by_email("me@example.com", TokenUpdate::access_token("new"))
            .await
            .unwrap();

        let record = store.get("me@example.com").await.unwrap();
        assert_eq!(record.access_token.as_deref(), Some("new"));
        assert_eq!(record.refresh_token.as_deref(), Some("rt"));
    }

    #[tokio::test]
    async fn update_without_record_is_a_no_op() {
        let store = MemoryTokenStore::new();
        store
            .update_by_email("nobody@example.com", TokenUpdate::clear())
            .await
            .unwrap();
        assert!(store.get("nobody@example.com").await.is_none());
    }

    #[tokio::test]
    async fn upsert_keeps_refresh_token_when_none_given() {
        let store = MemoryTokenStore::new();
        store.upsert_tokens("me@example.com", "at1", Some("rt1")).await.unwrap();
        store.upsert_tokens("me@example.com", "at2", None).await.unwrap();

        let record = store.get("me@example.com").await.unwrap();
        assert_eq!(record.access_token.as_deref(), Some("at2"));
        assert_eq!(record.refresh_token.as_deref(), Some("rt1"));
    }
}
