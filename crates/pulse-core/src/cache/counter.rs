//! Cache operation counter

use std::sync::atomic::{AtomicU64, Ordering};

/// Running count of cache-consulting operations since start or last reset
#[derive(Debug, Default)]
pub struct OperationCounter {
    count: AtomicU64,
}

impl OperationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("pulse_cache_operations_total").increment(1);
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}
