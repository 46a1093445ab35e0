//! Metrics collaborator
//!
//! The codec itself reports nothing. Components that wrap it, such as a
//! cache of decoded sessions, publish plain counters and gauges through a
//! [`MetricsSink`].
//!
//! Uses atomic values for thread-safe metrics collection.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Destination for named counters and gauges
pub trait MetricsSink: Send + Sync {
    /// Add `delta` to a monotonically increasing counter
    fn increment(&self, counter: &str, delta: u64);

    /// Overwrite the current value of a gauge
    fn set(&self, gauge: &str, value: i64);
}

/// In-memory sink keeping one atomic per metric name
#[derive(Debug, Default)]
pub struct AtomicMetricsRegistry {
    counters: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
    gauges: RwLock<BTreeMap<String, Arc<AtomicI64>>>,
}

impl AtomicMetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, name: &str) -> Option<Arc<AtomicU64>> {
        if let Ok(counters) = self.counters.read() {
            if let Some(counter) = counters.get(name) {
                return Some(Arc::clone(counter));
            }
        }
        let mut counters = self.counters.write().ok()?;
        Some(Arc::clone(counters.entry(name.to_string()).or_default()))
    }

    fn gauge(&self, name: &str) -> Option<Arc<AtomicI64>> {
        if let Ok(gauges) = self.gauges.read() {
            if let Some(gauge) = gauges.get(name) {
                return Some(Arc::clone(gauge));
            }
        }
        let mut gauges = self.gauges.write().ok()?;
        Some(Arc::clone(gauges.entry(name.to_string()).or_default()))
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .map(|map| {
                map.iter()
                    .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
                    .collect()
            })
            .unwrap_or_default();
        let gauges = self
            .gauges
            .read()
            .map(|map| {
                map.iter()
                    .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
                    .collect()
            })
            .unwrap_or_default();
        MetricsSnapshot { counters, gauges }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            counters = ?snapshot.counters,
            gauges = ?snapshot.gauges,
            "Metrics snapshot"
        );
    }
}

impl MetricsSink for AtomicMetricsRegistry {
    fn increment(&self, counter: &str, delta: u64) {
        if let Some(counter) = self.counter(counter) {
            counter.fetch_add(delta, Ordering::Relaxed);
        }
    }

    fn set(&self, gauge: &str, value: i64) {
        if let Some(gauge) = self.gauge(gauge) {
            gauge.store(value, Ordering::Relaxed);
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, i64>,
}

impl MetricsSnapshot {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }
}

/// One sampling period of a session cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionManagerStats {
    pub num_insert: u64,
    pub num_pick: u64,
    pub num_dropped: u64,
    /// Sessions currently held; a level, not a count of events
    pub num_cached: u64,
    pub num_timedout: u64,
}

/// Publishes [`SessionManagerStats`] samples under a common metric prefix
pub struct SessionManagerMetrics {
    sink: Arc<dyn MetricsSink>,
    insert: String,
    pick: String,
    dropped: String,
    cached: String,
    timedout: String,
}

impl SessionManagerMetrics {
    /// `prefix` is joined to each metric name with a dot; empty means none
    pub fn new(sink: Arc<dyn MetricsSink>, prefix: &str) -> Self {
        let name = |metric: &str| {
            if prefix.is_empty() {
                metric.to_string()
            } else {
                format!("{prefix}.{metric}")
            }
        };
        Self {
            insert: name("numinsert"),
            pick: name("numpick"),
            dropped: name("numdropped"),
            cached: name("numcached"),
            timedout: name("numtimedout"),
            sink,
        }
    }

    pub fn update(&self, stats: &SessionManagerStats) {
        self.sink.increment(&self.insert, stats.num_insert);
        self.sink.increment(&self.pick, stats.num_pick);
        self.sink.increment(&self.dropped, stats.num_dropped);
        self.sink
            .set(&self.cached, i64::try_from(stats.num_cached).unwrap_or(i64::MAX));
        self.sink.increment(&self.timedout, stats.num_timedout);
    }
}
