use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "push relay server")]
pub struct Cli {
    /// Static files, including the service worker bootstrap and its wasm
    #[clap(long, env, default_value = "assets")]
    pub assets_dir: PathBuf,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Distinct notification ids kept in the stats store, reports for new ids
    /// past this are counted under "unknown"
    #[clap(long, env, default_value_t = crate::MAX_TRACKED_IDS)]
    pub max_tracked_notifications: usize,
}
