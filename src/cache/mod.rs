// 缓存模块
// 进程内令牌缓存，以及基于 Redis 的授权 state 与限流计数

pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型，方便其他模块使用
pub use models::token::CachedTokens;
pub use operations::oauth_state::OAuthStateOperations;
pub use operations::token::TokenCache;
