use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户令牌数据库实体
///
/// 每个邮箱对应唯一一行。两个令牌字段互相独立，可以分别为空：
/// 从未授权时两者都为空，刷新令牌被撤销后两者都会被清空。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TokenRecord {
    pub email: String,
    #[sqlx(rename = "token")]
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 按邮箱更新令牌时要写入的字段
///
/// 外层 `None` 表示不修改该列，`Some(None)` 表示把该列置空。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUpdate {
    pub access_token: Option<Option<String>>,
    pub refresh_token: Option<Option<String>>,
}

impl TokenUpdate {
    /// 只更新访问令牌
    pub fn access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(Some(token.into())),
            refresh_token: None,
        }
    }

    /// 同时写入两个令牌
    pub fn both(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(Some(access_token.into())),
            refresh_token: Some(Some(refresh_token.into())),
        }
    }

    /// 清空两个令牌，用户需要重新授权
    pub fn clear() -> Self {
        Self {
            access_token: Some(None),
            refresh_token: Some(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}
