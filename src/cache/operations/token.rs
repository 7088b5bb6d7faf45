use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::models::token::CachedTokens;
use crate::database::TokenStore;

/// 令牌缓存
///
/// 进程启动时创建一次，通过 `AppState` 共享给所有请求。
/// 首次读取某个邮箱时从持久化存储加载，之后只在显式调用
/// `set` / `set_access_token` / `invalidate` 时变化，没有过期时间。
///
/// 两个令牌都不存在的记录不会被缓存：在用户完成授权之前，
/// 每次 `get` 都会重新查询存储，这样其他进程写入的首条记录也能被看到。
pub struct TokenCache {
    store: Arc<dyn TokenStore>,
    entries: RwLock<HashMap<String, CachedTokens>>,
}

impl TokenCache {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 获取令牌，缓存未命中时从存储加载
    pub async fn get(&self, email: &str) -> Result<CachedTokens, sqlx::Error> {
        if let Some(tokens) = self.entries.read().await.get(email) {
            return Ok(tokens.clone());
        }

        tracing::debug!("Token cache miss for {}, loading from store", email);
        let tokens: CachedTokens = self
            .store
            .find_by_email(email)
            .await?
            .map(Into::into)
            .unwrap_or_default();

        if !tokens.is_empty() {
            let mut entries = self.entries.write().await;
            // 加载期间可能已有刷新写入了更新的值，以缓存中的为准
            let cached = entries
                .entry(email.to_string())
                .or_insert_with(|| tokens.clone());
            return Ok(cached.clone());
        }

        Ok(tokens)
    }

    /// 覆盖两个令牌，不写入持久化存储
    pub async fn set(&self, email: &str, access_token: Option<String>, refresh_token: Option<String>) {
        let tokens = CachedTokens::new(access_token, refresh_token);
        let mut entries = self.entries.write().await;
        if tokens.is_empty() {
            entries.remove(email);
        } else {
            entries.insert(email.to_string(), tokens);
        }
    }

    /// 只覆盖访问令牌，保留缓存中的刷新令牌
    pub async fn set_access_token(&self, email: &str, access_token: &str) {
        let mut entries = self.entries.write().await;
        entries
            .entry(email.to_string())
            .or_default()
            .access_token = Some(access_token.to_string());
    }

    /// 删除该邮箱的缓存条目
    pub async fn invalidate(&self, email: &str) {
        self.entries.write().await.remove(email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryTokenStore;

    const EMAIL: &str = "me@example.com";

    #[tokio::test]
    async fn populates_from_store_once() {
        let store = Arc::new(MemoryTokenStore::new());
        store.insert(EMAIL, Some("at"), Some("rt")).await;
        let cache = TokenCache::new(store.clone());

        let first = cache.get(EMAIL).await.unwrap();
        let second = cache.get(EMAIL).await.unwrap();

        assert_eq!(first.access_token.as_deref(), Some("at"));
        assert_eq!(first, second);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn absent_record_is_rechecked() {
        let store = Arc::new(MemoryTokenStore::new());
        let cache = TokenCache::new(store.clone());

        assert!(cache.get(EMAIL).await.unwrap().is_empty());

        store.insert(EMAIL, Some("first"), Some("rt")).await;
        let tokens = cache.get(EMAIL).await.unwrap();

        assert_eq!(tokens.access_token.as_deref(), Some("first"));
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn set_does_not_touch_store() {
        let store = Arc::new(MemoryTokenStore::new());
        store.insert(EMAIL, Some("stored"), Some("rt")).await;
        let cache = TokenCache::new(store.clone());

        cache.set(EMAIL, Some("cached".into()), Some("rt2".into())).await;

        assert_eq!(
            cache.get(EMAIL).await.unwrap().access_token.as_deref(),
            Some("cached")
        );
        assert_eq!(
            store.get(EMAIL).await.unwrap().access_token.as_deref(),
            Some("stored")
        );
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn set_access_token_keeps_refresh_token() {
        let store = Arc::new(MemoryTokenStore::new());
        store.insert(EMAIL, Some("old"), Some("rt")).await;
        let cache = TokenCache::new(store);

        cache.get(EMAIL).await.unwrap();
        cache.set_access_token(EMAIL, "new").await;

        let tokens = cache.get(EMAIL).await.unwrap();
        assert_eq!(tokens.access_token.as_deref(), Some("new"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt"));
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let store = Arc::new(MemoryTokenStore::new());
        store.insert(EMAIL, Some("at"), Some("rt")).await;
        let cache = TokenCache::new(store.clone());

        cache.get(EMAIL).await.unwrap();
        cache.invalidate(EMAIL).await;
        cache.get(EMAIL).await.unwrap();

        assert_eq!(store.reads(), 2);
    }
}
