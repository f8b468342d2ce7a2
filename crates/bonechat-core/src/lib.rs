pub mod config;
pub mod error;
pub mod types;

pub use config::BonechatConfig;
pub use error::{BonechatError, Result};
pub use types::*;
