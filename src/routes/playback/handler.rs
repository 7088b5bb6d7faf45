use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::{AppState, error::AppError};

/// 轮询接口，返回当前播放状态，禁止任何缓存
#[axum::debug_handler]
pub async fn current_track(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let status = state.playback.current_playback().await.map_err(|e| {
        tracing::error!("Failed to fetch track data: {}", e);
        e
    })?;

    Ok((
        [
            (
                header::CACHE_CONTROL,
                "no-store, no-cache, must-revalidate, proxy-revalidate",
            ),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(status),
    ))
}
