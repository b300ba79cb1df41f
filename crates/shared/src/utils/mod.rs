#[cfg(feature = "wasm")]
pub mod fetch;

#[cfg(feature = "wasm")]
pub mod tracing;
