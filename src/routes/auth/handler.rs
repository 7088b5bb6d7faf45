use axum::{
    extract::{Query, State},
    response::Redirect,
};
use reqwest::Url;

use crate::{AppState, cache::OAuthStateOperations, error::AppError};

use super::model::{CallbackOutcome, CallbackQuery};

/// 跳转到 Spotify 授权页面
#[axum::debug_handler]
pub async fn login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let oauth_state = uuid::Uuid::new_v4().simple().to_string();
    OAuthStateOperations::store_state(
        &state.redis,
        &oauth_state,
        state.config.oauth_state_ttl().as_secs(),
    )
    .await?;

    let url = state
        .spotify
        .authorize_url(&state.config.spotify_redirect_url, &oauth_state)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("Redirecting to Spotify authorization page");
    Ok(Redirect::to(&url))
}

/// 授权回调：用授权码换取令牌并写入存储和缓存
#[axum::debug_handler]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if let Some(error) = query.error.as_deref() {
        tracing::warn!("Spotify authorization was denied: {}", error);
    }
    let Some(code) = query.code.as_deref() else {
        return Redirect::to("/");
    };

    match complete_authorization(&state, code, query.state.as_deref()).await {
        Ok(CallbackOutcome::Authorized) => Redirect::to("/"),
        Ok(CallbackOutcome::EmailMismatch(email)) => {
            tracing::warn!("Rejected authorization for unexpected account {:?}", email);
            Redirect::to(&error_redirect("invalidEmail", email.as_deref()))
        }
        Err(e) => {
            tracing::error!("Error during callback: {}", e);
            Redirect::to(&error_redirect("callbackError", None))
        }
    }
}

async fn complete_authorization(
    state: &AppState,
    code: &str,
    oauth_state: Option<&str>,
) -> Result<CallbackOutcome, AppError> {
    let Some(oauth_state) = oauth_state else {
        return Err(AppError::BadRequest("missing state".into()));
    };
    if !OAuthStateOperations::take_state(&state.redis, oauth_state).await? {
        return Err(AppError::BadRequest("unknown or expired state".into()));
    }

    let tokens = state
        .spotify
        .exchange_code(code, &state.config.spotify_redirect_url)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    let profile = state
        .spotify
        .current_user(&tokens.access_token)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let expected = state.config.spotify_email.as_str();
    if profile.email.as_deref() != Some(expected) {
        return Ok(CallbackOutcome::EmailMismatch(profile.email));
    }

    state
        .store
        .upsert_tokens(
            expected,
            &tokens.access_token,
            tokens.refresh_token.as_deref(),
        )
        .await?;

    match tokens.refresh_token {
        Some(refresh_token) => {
            state
                .token_cache
                .set(expected, Some(tokens.access_token), Some(refresh_token))
                .await
        }
        // 存储保留了原来的刷新令牌，下次读取时重新加载
        None => state.token_cache.invalidate(expected).await,
    }

    tracing::info!("Spotify account {} authorized", expected);
    Ok(CallbackOutcome::Authorized)
}

/// 构造带错误参数的首页地址
fn error_redirect(error: &str, email: Option<&str>) -> String {
    let mut url = Url::parse("http://localhost/").expect("static url is valid");
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("error", error);
        if let Some(email) = email {
            pairs.append_pair("email", email);
        }
    }
    format!("/?{}", url.query().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_redirect_encodes_email() {
        assert_eq!(
            error_redirect("invalidEmail", Some("someone+else@example.com")),
            "/?error=invalidEmail&email=someone%2Belse%40example.com"
        );
        assert_eq!(error_redirect("callbackError", None), "/?error=callbackError");
    }
}
