//! Spotify Web API 客户端
//!
//! 只包含本服务用到的接口：授权服务器的令牌端点、用户资料和当前播放。
//! 所有请求共享一个带超时的 `reqwest::Client`。

pub mod auth;
pub mod models;
pub mod player;

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::Config;

pub use auth::{AUTHORIZE_SCOPES, TokenResponse};
pub use models::{PlaybackStatus, Track, UserProfile};
pub use player::PlayerResponse;

#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    /// 网络错误、超时或响应体无法解析
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl SpotifyError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SpotifyError::Status { status, .. } => Some(*status),
            SpotifyError::Http(e) => e.status(),
            SpotifyError::InvalidUrl(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Self::with_endpoints(
            &config.spotify_accounts_url,
            &config.spotify_api_url,
            &config.spotify_client_id,
            &config.spotify_client_secret,
            config.http_timeout(),
        )
    }

    pub fn with_endpoints(
        accounts_url: &str,
        api_url: &str,
        client_id: &str,
        client_secret: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

/// 非 2xx 响应转换为错误，保留响应体便于排查
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SpotifyError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SpotifyError::Status { status, body });
    }
    Ok(resp)
}
