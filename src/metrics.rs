//! Per-operation call counts and latency for the storage layer.
//!
//! One collector is shared by every repository. Operation names are
//! `<table>.<method>`, e.g. `students.search`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Default)]
struct OperationStats {
    count: AtomicU64,
    total_nanos: AtomicU64,
}

#[derive(Debug, Default)]
pub struct OperationMetrics {
    operations: RwLock<HashMap<&'static str, Arc<OperationStats>>>,
}

/// Point-in-time view of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSnapshot {
    pub count: u64,
    pub total_nanos: u64,
    pub average_nanos: u64,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: &'static str, nanos: u64) {
        let stats = self.stats_for(operation);
        stats.count.fetch_add(1, Ordering::Relaxed);
        stats.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Start timing `operation`; the call is recorded when the guard drops.
    pub fn start(&self, operation: &'static str) -> OperationTimer<'_> {
        OperationTimer {
            metrics: self,
            operation,
            started: Instant::now(),
        }
    }

    pub fn count(&self, operation: &str) -> u64 {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .map_or(0, |stats| stats.count.load(Ordering::Relaxed))
    }

    /// All recorded operations, ordered by name
    pub fn snapshot(&self) -> BTreeMap<String, OperationSnapshot> {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, stats)| {
                let count = stats.count.load(Ordering::Relaxed);
                let total_nanos = stats.total_nanos.load(Ordering::Relaxed);
                let average_nanos = if count == 0 { 0 } else { total_nanos / count };
                (
                    name.to_string(),
                    OperationSnapshot {
                        count,
                        total_nanos,
                        average_nanos,
                    },
                )
            })
            .collect()
    }

    fn stats_for(&self, operation: &'static str) -> Arc<OperationStats> {
        if let Some(stats) = self
            .operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
        {
            return Arc::clone(stats);
        }

        let mut operations = self
            .operations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(operations.entry(operation).or_default())
    }
}

/// Records elapsed time for one operation on drop
pub struct OperationTimer<'a> {
    metrics: &'a OperationMetrics,
    operation: &'static str,
    started: Instant,
}

impl Drop for OperationTimer<'_> {
    fn drop(&mut self) {
        let nanos = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.metrics.record(self.operation, nanos);
    }
}
