pub mod error_handler;
pub mod http;
mod session_store;
pub mod telegram;

pub use session_store::SessionStore;
