use reqwest::StatusCode;

use super::{PlaybackStatus, SpotifyClient, SpotifyError, check_response};

/// 当前播放接口的原始结果
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerResponse {
    /// 204，没有任何播放内容
    NothingPlaying,
    /// 200，响应体
    Playback(PlaybackStatus),
    /// 401，访问令牌过期
    Expired,
}

impl SpotifyClient {
    pub async fn currently_playing(
        &self,
        access_token: &str,
    ) -> Result<PlayerResponse, SpotifyError> {
        let url = format!("{}/me/player/currently-playing", self.api_url);
        tracing::debug!("Spotify GET {}", url);

        let resp = self.http.get(&url).bearer_auth(access_token).send().await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(PlayerResponse::NothingPlaying),
            StatusCode::UNAUTHORIZED => Ok(PlayerResponse::Expired),
            _ => {
                let status = check_response(resp).await?.json().await?;
                Ok(PlayerResponse::Playback(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn respond_with(template: ResponseTemplate) -> Result<PlayerResponse, SpotifyError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .and(header("authorization", "Bearer AT"))
            .respond_with(template)
            .mount(&server)
            .await;

        let client = SpotifyClient::with_endpoints(
            &server.uri(),
            &format!("{}/v1", server.uri()),
            "client",
            "secret",
            Duration::from_secs(2),
        )
        .unwrap();
        client.currently_playing("AT").await
    }

    #[tokio::test]
    async fn no_content_means_nothing_playing() {
        let resp = respond_with(ResponseTemplate::new(204)).await.unwrap();
        assert_eq!(resp, PlayerResponse::NothingPlaying);
    }

    #[tokio::test]
    async fn unauthorized_means_expired() {
        let resp = respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .await
        .unwrap();
        assert_eq!(resp, PlayerResponse::Expired);
    }

    #[tokio::test]
    async fn ok_body_is_parsed() {
        let resp = respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_playing": true,
            "progress_ms": 1000,
            "item": { "id": "t", "name": "Track" }
        })))
        .await
        .unwrap();

        match resp {
            PlayerResponse::Playback(status) => {
                assert!(status.is_playing);
                assert_eq!(status.progress_ms(), Some(1000));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn other_status_is_an_error() {
        let err = respond_with(ResponseTemplate::new(503)).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let err = respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({ "is_playing": true })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SpotifyError::Http(ref e) if e.is_timeout()));
    }
}
