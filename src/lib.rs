//! assetsync - keeps a locally cached rules database in sync with its
//! latest published release.

pub mod engine;

pub use engine::config::SyncConfig;
pub use engine::http::{HttpClient, ReqwestHttpClient};
pub use engine::updater::{UpdateError, Updater};
