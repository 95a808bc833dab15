// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler through `Arc<AppState>`. Requests never
// share datasets: each one reads a config snapshot, builds its own RNG and
// generates from scratch.
//
// Thread safety:
//   - Atomic counter for lock-free request tracking.
//   - parking_lot::RwLock around the configuration.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::runtime_config::DashboardConfig;

pub struct AppState {
    pub config: Arc<RwLock<DashboardConfig>>,

    /// Number of dataset requests answered since startup.
    pub requests_served: AtomicU64,

    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            requests_served: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Clone the current configuration so the lock is not held while a
    /// dataset is generated.
    pub fn config_snapshot(&self) -> DashboardConfig {
        self.config.read().clone()
    }

    /// Count one served request and return the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// RNG for one request.
    ///
    /// Precedence: explicit request seed, then the configured fixed seed,
    /// then OS entropy.
    pub fn rng_for(&self, request_seed: Option<u64>) -> StdRng {
        match request_seed.or(self.config.read().fixed_seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
