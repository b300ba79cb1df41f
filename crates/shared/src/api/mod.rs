pub mod error;
pub mod payloads;

mod object;
pub use object::*;

pub const API_BASE_PATH: &str = "/api/";
