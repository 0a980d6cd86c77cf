//! Shared server state

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use finguard_core::api::AdvisorPipeline;
use tokio::sync::broadcast;

#[derive(Debug)]
pub struct ServerStats {
    pub started_at: Instant,
    pub requests_total: u64,
    pub answered_total: u64,
    pub denied_total: u64,
    pub errors_total: u64,
    pub requests_by_path: HashMap<String, u64>,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests_total: 0,
            answered_total: 0,
            denied_total: 0,
            errors_total: 0,
            requests_by_path: HashMap::new(),
        }
    }

    pub fn increment_request(&mut self, path: &str) {
        self.requests_total += 1;
        *self.requests_by_path.entry(path.to_string()).or_insert(0) += 1;
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session_id: String,
    pub pipeline: AdvisorPipeline,
    pub degraded: bool,
    pub stats: Arc<RwLock<ServerStats>>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(
        session_id: String,
        pipeline: AdvisorPipeline,
        degraded: bool,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        Self {
            session_id,
            pipeline,
            degraded,
            stats: Arc::new(RwLock::new(ServerStats::new())),
            shutdown_tx,
        }
    }

    /// Stats are best effort; a poisoned lock skips the update.
    pub fn with_stats(&self, f: impl FnOnce(&mut ServerStats)) {
        if let Ok(mut stats) = self.stats.write() {
            f(&mut stats);
        }
    }
}
