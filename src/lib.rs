pub mod config;
pub mod notify;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use config::ServerConfig;
use notify::Notifier;
use storage::Storage;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    /// Completion notification sender (fire-and-forget).
    pub notifier: Arc<Notifier>,
    pub started_at: std::time::Instant,
}
