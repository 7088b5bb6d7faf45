use serde::{Deserialize, Serialize};

use crate::database::TokenRecord;

/// 令牌缓存数据模型，镜像持久化记录中的两个令牌字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl CachedTokens {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// 两个令牌都不存在
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl From<TokenRecord> for CachedTokens {
    fn from(record: TokenRecord) -> Self {
        Self::new(record.access_token, record.refresh_token)
    }
}
