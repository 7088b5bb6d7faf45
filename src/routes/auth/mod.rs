mod handler;
mod model;

pub use handler::{callback, login};
pub use model::CallbackQuery;
