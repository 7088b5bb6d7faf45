use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;

use crate::cache::keys::oauth_state_key;

/// 授权 state 缓存操作
pub struct OAuthStateOperations;

impl OAuthStateOperations {
    /// 保存一次授权请求的 state，过期后自动失效
    pub async fn store_state(
        redis: &Arc<RedisClient>,
        state: &str,
        ttl: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let created_at = chrono::Utc::now().timestamp();
        let _: () = conn.set_ex(oauth_state_key(state), created_at, ttl).await?;

        Ok(())
    }

    /// 校验并消费 state，每个 state 只能使用一次
    pub async fn take_state(
        redis: &Arc<RedisClient>,
        state: &str,
    ) -> Result<bool, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let removed: i64 = conn.del(oauth_state_key(state)).await?;

        Ok(removed > 0)
    }
}
