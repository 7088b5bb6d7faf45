use std::sync::Arc;

use config::Config;
use redis::Client as RedisClient;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod spotify;

use cache::TokenCache;
use database::TokenStore;
use services::{PlaybackFetcher, TokenRefresher};
use spotify::SpotifyClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub redis: Arc<RedisClient>,
    pub spotify: SpotifyClient,
    pub token_cache: Arc<TokenCache>,
    pub store: Arc<dyn TokenStore>,
    pub playback: Arc<PlaybackFetcher>,
}

impl AppState {
    /// 组装进程级服务：令牌缓存、刷新服务和播放状态服务都只创建一次
    pub fn new(
        config: Config,
        store: Arc<dyn TokenStore>,
        redis: Arc<RedisClient>,
    ) -> Result<Self, reqwest::Error> {
        let spotify = SpotifyClient::new(&config)?;
        let token_cache = Arc::new(TokenCache::new(store.clone()));
        let refresher = Arc::new(TokenRefresher::new(
            spotify.clone(),
            token_cache.clone(),
            store.clone(),
        ));
        let playback = Arc::new(PlaybackFetcher::new(
            config.spotify_email.clone(),
            spotify.clone(),
            token_cache.clone(),
            refresher,
        ));

        Ok(Self {
            config,
            redis,
            spotify,
            token_cache,
            store,
            playback,
        })
    }
}
