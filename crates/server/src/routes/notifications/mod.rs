mod stats;
pub use stats::router;
