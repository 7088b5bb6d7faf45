use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::cache::TokenCache;
use crate::database::{TokenStore, TokenUpdate};
use crate::error::AppError;
use crate::spotify::{SpotifyClient, SpotifyError};

/// 访问令牌刷新服务
///
/// 同一邮箱同时最多只有一次刷新在进行。排队等待的调用者拿到锁后先看缓存：
/// 如果缓存里的访问令牌已经不是过期的那个，说明前一个调用者刚刚刷新过，直接使用即可；
/// 如果前一个调用者发现刷新令牌已被撤销，等待者得到同样的结果。
pub struct TokenRefresher {
    spotify: SpotifyClient,
    cache: Arc<TokenCache>,
    store: Arc<dyn TokenStore>,
    in_flight: std::sync::Mutex<HashMap<String, Arc<Mutex<RefreshSlot>>>>,
}

/// 每个邮箱的刷新锁保护的状态
#[derive(Default)]
struct RefreshSlot {
    // 最近一次因撤销而失败的刷新所针对的过期访问令牌
    revoked: Option<String>,
}

impl TokenRefresher {
    pub fn new(spotify: SpotifyClient, cache: Arc<TokenCache>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            spotify,
            cache,
            store,
            in_flight: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// 刷新 `email` 的访问令牌
    ///
    /// `expired_token` 是刚刚收到 401 的访问令牌。返回 `Ok(None)` 表示没有刷新令牌，
    /// 无法完成认证；刷新令牌被撤销时返回 `AppError::ReauthenticationRequired`。
    pub async fn refresh(
        &self,
        email: &str,
        expired_token: &str,
    ) -> Result<Option<String>, AppError> {
        let lock = self.lock_for(email);
        let mut slot = lock.lock().await;

        let tokens = self.cache.get(email).await?;
        if let Some(current) = tokens.access_token.as_deref() {
            if current != expired_token {
                tracing::debug!("Access token for {} was refreshed concurrently", email);
                return Ok(Some(current.to_string()));
            }
        }

        let Some(refresh_token) = tokens.refresh_token else {
            if slot.revoked.as_deref() == Some(expired_token) {
                tracing::debug!("Refresh token for {} was revoked by a concurrent refresh", email);
                return Err(AppError::ReauthenticationRequired);
            }
            tracing::warn!("No refresh token stored for {}", email);
            return Ok(None);
        };

        tracing::info!("Refreshing Spotify access token for {}", email);
        match self.spotify.refresh_access_token(&refresh_token).await {
            Ok(response) => {
                let update = match response.refresh_token.as_deref() {
                    Some(rotated) => TokenUpdate::both(&response.access_token, rotated),
                    None => TokenUpdate::access_token(&response.access_token),
                };
                if let Err(e) = self.store.update_by_email(email, update).await {
                    // 新令牌依然有效，先写缓存，下次刷新时再持久化
                    tracing::error!("Failed to persist refreshed token for {}: {}", email, e);
                }

                match response.refresh_token {
                    Some(rotated) => {
                        self.cache
                            .set(email, Some(response.access_token.clone()), Some(rotated))
                            .await
                    }
                    None => self.cache.set_access_token(email, &response.access_token).await,
                }

                slot.revoked = None;
                tracing::info!("Spotify access token refreshed for {}", email);
                Ok(Some(response.access_token))
            }
            Err(e) if is_revoked(&e) => {
                tracing::warn!(
                    "Refresh token for {} is invalid or revoked, re-authentication required: {}",
                    email,
                    e
                );
                self.cache.invalidate(email).await;
                if let Err(e) = self.store.update_by_email(email, TokenUpdate::clear()).await {
                    tracing::error!("Failed to clear revoked tokens for {}: {}", email, e);
                }
                slot.revoked = Some(expired_token.to_string());
                Err(AppError::ReauthenticationRequired)
            }
            Err(e) => {
                tracing::error!("Error refreshing token for {}: {}", email, e);
                Err(AppError::RefreshFailed(e.to_string()))
            }
        }
    }

    fn lock_for(&self, email: &str) -> Arc<Mutex<RefreshSlot>> {
        let mut locks = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(email.to_string()).or_default().clone()
    }
}

/// 令牌端点返回 4xx 表示刷新令牌本身无效；408 和 429 是暂时性的
fn is_revoked(err: &SpotifyError) -> bool {
    match err {
        SpotifyError::Status { status, .. } => {
            status.is_client_error()
                && *status != StatusCode::REQUEST_TIMEOUT
                && *status != StatusCode::TOO_MANY_REQUESTS
        }
        _ => false,
    }
}
