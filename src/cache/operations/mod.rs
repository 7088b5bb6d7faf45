/// 缓存操作
pub mod oauth_state;
pub mod token;

pub use oauth_state::OAuthStateOperations;
pub use token::TokenCache;
