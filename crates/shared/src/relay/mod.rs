//! Turns push messages into system notifications and routes the user's
//! reaction to them

pub mod config;
pub use config::RelayConfig;

mod notification;
pub use notification::*;

pub mod host;

mod handlers;
pub use handlers::*;
