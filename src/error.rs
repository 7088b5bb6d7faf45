use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub mod error_codes {
    pub const BAD_REQUEST: i32 = 1000;
    pub const REAUTHENTICATION_REQUIRED: i32 = 1002;
    pub const RATE_LIMIT: i32 = 1005;
    pub const UPSTREAM_ERROR: i32 = 2000;
    pub const REFRESH_FAILED: i32 = 2001;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 刷新令牌已失效或被撤销，需要重新走授权流程
    #[error("refresh token is invalid or revoked, re-authentication required")]
    ReauthenticationRequired,
    /// 刷新失败（网络、服务端错误等），下次轮询可重试
    #[error("failed to refresh access token: {0}")]
    RefreshFailed(String),
    /// 播放接口返回的其他错误
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("too many requests, retry in {0}s")]
    RateLimited(u64),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::ReauthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                error_codes::REAUTHENTICATION_REQUIRED,
            ),
            AppError::RefreshFailed(_) => (StatusCode::BAD_GATEWAY, error_codes::REFRESH_FAILED),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST),
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let error_message = match &self {
            AppError::ReauthenticationRequired => "Spotify 授权已失效，请重新登录".to_string(),
            AppError::RateLimited(secs) => format!("请求过于频繁，请在{}秒后重试", secs),
            AppError::BadRequest(msg) => format!("请求无效: {}", msg),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                "内部服务器错误".to_string()
            }
            other => format!("获取播放状态失败: {}", other),
        };

        let body = Json(ErrorResponse {
            code,
            error_message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reauthentication_is_distinguished_from_transient_failures() {
        let reauth = AppError::ReauthenticationRequired.into_response();
        let transient = AppError::Upstream("HTTP 503".into()).into_response();

        assert_eq!(reauth.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(transient.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn storage_failures_are_internal_errors() {
        let resp = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
