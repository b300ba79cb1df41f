mod push_notifications;
pub use push_notifications::*;
