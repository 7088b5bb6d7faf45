use std::env;
use std::time::Duration;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// 被展示用户的 Spotify 邮箱，也是令牌记录的主键
    pub spotify_email: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_url: String,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    pub http_timeout_secs: u64,
    pub oauth_state_ttl_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: optional_number("SERVER_PORT", 3000),
            spotify_email: env::var("SPOTIFY_EMAIL")?,
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_url: env::var("SPOTIFY_REDIRECT_URL")?,
            spotify_accounts_url: env::var("SPOTIFY_ACCOUNTS_URL")
                .unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string()),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            http_timeout_secs: optional_number("HTTP_TIMEOUT_SECS", 10),
            oauth_state_ttl_secs: optional_number("OAUTH_STATE_TTL", 600),
            rate_limit_window_secs: optional_number("RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: optional_number("RATE_LIMIT_REQUESTS", 120),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn oauth_state_ttl(&self) -> Duration {
        Duration::from_secs(self.oauth_state_ttl_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

// 可选的数值配置，缺失或无法解析时使用默认值
fn optional_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim_end_matches('s').parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_number_uses_default() {
        assert_eq!(optional_number::<u16>("SPOTIFY_STATUS_TEST_UNSET_PORT", 3000), 3000);
    }

    #[test]
    fn number_with_seconds_suffix_is_parsed() {
        // 只有这个测试使用该变量
        unsafe { env::set_var("SPOTIFY_STATUS_TEST_WINDOW", "90s") };
        assert_eq!(optional_number::<u64>("SPOTIFY_STATUS_TEST_WINDOW", 60), 90);

        unsafe { env::set_var("SPOTIFY_STATUS_TEST_WINDOW", "soon") };
        assert_eq!(optional_number::<u64>("SPOTIFY_STATUS_TEST_WINDOW", 60), 60);
    }
}
