pub mod memory;
pub mod user;

pub use memory::MemoryTokenStore;
pub use user::{PgTokenStore, TokenStore};
