//! Application state shared across API handlers

use std::sync::Arc;

use icswap_core::AppConfig;
use swap_pool::{SwapOrchestrator, SwapRun};
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    /// Held for the whole of a swap sequence; a second caller sees it locked.
    orchestrator: Mutex<Option<SwapOrchestrator>>,
}

/// The swap session is in use by another request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBusy;

impl AppState {
    /// Create a new application state with default config and no session
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                orchestrator: Mutex::new(None),
            }),
        }
    }

    /// Create with a config and an open swap session
    pub fn with_orchestrator(config: AppConfig, orchestrator: SwapOrchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                orchestrator: Mutex::new(Some(orchestrator)),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Install a swap session, closing the previous one
    pub async fn attach(&self, orchestrator: SwapOrchestrator) {
        let mut slot = self.inner.orchestrator.lock().await;
        if let Some(previous) = slot.replace(orchestrator) {
            previous.close();
        }
        tracing::info!("Swap session attached");
    }

    /// Lock the swap session without waiting
    pub fn session(&self) -> Result<MutexGuard<'_, Option<SwapOrchestrator>>, SessionBusy> {
        self.inner.orchestrator.try_lock().map_err(|_| SessionBusy)
    }

    /// Close the swap session, waiting for an in-flight sequence to finish.
    /// Returns the unfinished run, if any.
    pub async fn close(&self) -> Option<SwapRun> {
        let mut slot = self.inner.orchestrator.lock().await;
        slot.take().and_then(SwapOrchestrator::close)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
