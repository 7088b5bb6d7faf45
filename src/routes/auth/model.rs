use serde::Deserialize;

/// 授权回调参数
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// 用户拒绝授权时 Spotify 返回的错误
    pub error: Option<String>,
}

/// 回调处理结果
#[derive(Debug, PartialEq, Eq)]
pub(super) enum CallbackOutcome {
    Authorized,
    /// 授权的账号与配置的邮箱不一致
    EmailMismatch(Option<String>),
}
