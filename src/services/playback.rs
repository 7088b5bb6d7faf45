use std::sync::Arc;

use super::TokenRefresher;
use crate::cache::TokenCache;
use crate::error::AppError;
use crate::spotify::{PlaybackStatus, PlayerResponse, SpotifyClient};

/// 单次请求的结果
enum Attempt {
    Done(PlaybackStatus),
    Expired,
}

/// 播放状态获取服务
///
/// 每次调用返回一个归一化的 `PlaybackStatus`。遇到 401 时最多刷新一次令牌并重试一次，
/// 重试的结果就是最终结果。
pub struct PlaybackFetcher {
    email: String,
    spotify: SpotifyClient,
    cache: Arc<TokenCache>,
    refresher: Arc<TokenRefresher>,
}

impl PlaybackFetcher {
    pub fn new(
        email: impl Into<String>,
        spotify: SpotifyClient,
        cache: Arc<TokenCache>,
        refresher: Arc<TokenRefresher>,
    ) -> Self {
        Self {
            email: email.into(),
            spotify,
            cache,
            refresher,
        }
    }

    pub async fn current_playback(&self) -> Result<PlaybackStatus, AppError> {
        let tokens = self.cache.get(&self.email).await?;
        let Some(access_token) = tokens.access_token else {
            // 从未授权和没有播放在前端看起来一样
            tracing::debug!("No access token for {}, reporting idle", self.email);
            return Ok(PlaybackStatus::idle());
        };

        if let Attempt::Done(status) = self.attempt(&access_token).await? {
            return Ok(status);
        }

        tracing::info!("Access token expired, refreshing...");
        let new_token = match self.refresher.refresh(&self.email, &access_token).await {
            Ok(Some(token)) => token,
            Ok(None) | Err(AppError::RefreshFailed(_)) => {
                return Err(AppError::Upstream("failed to refresh token".into()));
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Token refreshed, retrying...");
        match self.attempt(&new_token).await? {
            Attempt::Done(status) => Ok(status),
            Attempt::Expired => Err(AppError::Upstream(
                "access token rejected after refresh".into(),
            )),
        }
    }

    async fn attempt(&self, access_token: &str) -> Result<Attempt, AppError> {
        let response = self
            .spotify
            .currently_playing(access_token)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(match response {
            PlayerResponse::Expired => Attempt::Expired,
            PlayerResponse::NothingPlaying => Attempt::Done(PlaybackStatus::idle()),
            PlayerResponse::Playback(status) => Attempt::Done(normalize(status)),
        })
    }
}

/// 广告不展示为正在播放；暂停时保留最后的曲目和进度
fn normalize(status: PlaybackStatus) -> PlaybackStatus {
    if status.is_ad() {
        return PlaybackStatus::idle();
    }
    if !status.is_playing {
        return PlaybackStatus::stopped(status.item.flatten(), status.progress_ms.flatten());
    }
    status
}
