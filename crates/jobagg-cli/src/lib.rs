//! Interactive interface for jobagg

mod config;
mod session;
pub mod ui;

pub use config::AppConfig;
pub use session::Session;

// Re-export core types
pub use jobagg_core::{Error, Result};
