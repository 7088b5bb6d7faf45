pub mod auth;
pub mod playback;

use axum::{Router, routing::get};

use crate::AppState;

pub async fn health() -> &'static str {
    "ok"
}

/// 公开路由，不含中间件
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/current-track", get(playback::current_track))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/health", get(health))
}
