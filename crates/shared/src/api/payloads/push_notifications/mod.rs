mod notification;
pub use notification::*;

mod stats;
pub use stats::*;
