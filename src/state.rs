//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! The schema layer is stateless, so the only shared data is the API key and
//! a handful of monotonically increasing counters for the health endpoint.
//! Atomics keep handlers lock-free.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::ServerConfig;

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AppState {
    /// Required `X-API-Key` value. `None` means dev mode.
    pub api_key: Option<String>,

    /// Strategies run through the validator.
    pub validations: AtomicU64,

    /// Strategies that only became valid through the sanitizer.
    pub repairs: AtomicU64,

    /// Strategies rejected (invalid, unfixable or not JSON).
    pub rejections: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub validations: u64,
    pub repairs:     u64,
    pub rejections:  u64,
}

impl AppState {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key, ..Self::default() }
    }

    pub fn record_validation(&self) {
        self.validations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repair(&self) {
        self.repairs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counters(&self) -> Counters {
        Counters {
            validations: self.validations.load(Ordering::Relaxed),
            repairs:     self.repairs.load(Ordering::Relaxed),
            rejections:  self.rejections.load(Ordering::Relaxed),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Construct the shared state and wrap it in an `Arc` ready for the router.
pub fn build_state(config: &ServerConfig) -> SharedState {
    Arc::new(AppState::new(config.api_key.clone()))
}
