// 数据库模块
// 包含令牌实体定义和存储库操作

pub mod models;
pub mod repositories;

// 重新导出常用类型，方便其他模块使用
pub use models::user::{TokenRecord, TokenUpdate};
pub use repositories::{MemoryTokenStore, PgTokenStore, TokenStore};
