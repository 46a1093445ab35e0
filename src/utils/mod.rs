//! # Utility Modules
//!
//! Supporting pieces that sit beside the codec rather than inside it.
//!
//! ## Components
//! - **Logging**: `tracing` subscriber setup from [`crate::config::LoggingConfig`]
//! - **Metrics**: counter/gauge sink and the session manager reporter
//! - **Limiter**: admission control for outstanding move operations

pub mod limiter;
pub mod logging;
pub mod metrics;

// Re-export public types for advanced users
pub use limiter::{MoveOperationLimiter, MoveOperationToken, OutstandingMoveLimiter};
pub use metrics::{AtomicMetricsRegistry, MetricsSink, SessionManagerMetrics, SessionManagerStats};
