// assetsync Engine - Core module structure
pub mod cli;
pub mod config;
pub mod http;
pub mod updater;

pub use config::SyncConfig;
pub use updater::Updater;
