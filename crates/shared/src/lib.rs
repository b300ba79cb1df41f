pub mod api;
pub mod relay;
pub mod utils;

#[cfg(feature = "backend")]
mod backend;
#[cfg(feature = "backend")]
pub use backend::*;
