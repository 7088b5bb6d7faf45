// 业务服务
// 令牌刷新与播放状态获取

pub mod playback;
pub mod token_refresher;

pub use playback::PlaybackFetcher;
pub use token_refresher::TokenRefresher;
