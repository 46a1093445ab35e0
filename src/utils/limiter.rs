//! # Move Operation Limiter
//!
//! Admission control for maintenance jobs that issue document moves. A job
//! asks for a [`MoveOperationToken`] before each move and holds it until the
//! move is acknowledged; the slot frees up when the token is released or
//! dropped.
//!
//! ## Usage
//! ```rust
//! use document_protocol::utils::limiter::{MoveOperationLimiter, OutstandingMoveLimiter};
//!
//! let limiter = OutstandingMoveLimiter::new(1);
//! let token = limiter.begin_operation();
//! assert!(limiter.is_above_limit());
//! token.release();
//! assert!(!limiter.has_pending());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Hands out one token per throttled move operation
pub trait MoveOperationLimiter: Send + Sync {
    fn begin_operation(&self) -> MoveOperationToken;
}

type ReleaseFn = Box<dyn FnOnce() + Send + 'static>;

/// Proof of one admitted operation; runs its release action exactly once
pub struct MoveOperationToken {
    on_release: Option<ReleaseFn>,
}

impl MoveOperationToken {
    pub fn new<F>(on_release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Token that tracks nothing
    pub fn detached() -> Self {
        Self { on_release: None }
    }

    pub fn release(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release();
        }
    }
}

impl Drop for MoveOperationToken {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for MoveOperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveOperationToken")
            .field("pending", &self.on_release.is_some())
            .finish()
    }
}

/// Counts outstanding operations against a fixed ceiling.
///
/// `begin_operation` never blocks; the job polls `is_above_limit` and holds
/// back new moves while it returns true.
#[derive(Debug, Clone)]
pub struct OutstandingMoveLimiter {
    outstanding: Arc<AtomicUsize>,
    max_outstanding: usize,
}

impl OutstandingMoveLimiter {
    pub fn new(max_outstanding: usize) -> Self {
        Self {
            outstanding: Arc::new(AtomicUsize::new(0)),
            max_outstanding,
        }
    }

    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    pub fn is_above_limit(&self) -> bool {
        self.outstanding() >= self.max_outstanding
    }

    pub fn has_pending(&self) -> bool {
        self.outstanding() > 0
    }
}

impl MoveOperationLimiter for OutstandingMoveLimiter {
    fn begin_operation(&self) -> MoveOperationToken {
        let now = self.outstanding.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(outstanding = now, max = self.max_outstanding, "Move operation started");

        let outstanding = Arc::clone(&self.outstanding);
        MoveOperationToken::new(move || {
            let left = outstanding.fetch_sub(1, Ordering::AcqRel) - 1;
            trace!(outstanding = left, "Move operation finished");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_reached_and_cleared() {
        let limiter = OutstandingMoveLimiter::new(2);
        assert!(!limiter.has_pending());

        let first = limiter.begin_operation();
        assert!(!limiter.is_above_limit());
        let second = limiter.begin_operation();
        assert!(limiter.is_above_limit());
        assert_eq!(limiter.outstanding(), 2);

        first.release();
        assert!(!limiter.is_above_limit());
        drop(second);
        assert!(!limiter.has_pending());
    }

    #[test]
    fn test_release_runs_once() {
        let limiter = OutstandingMoveLimiter::new(4);
        let token = limiter.begin_operation();
        // explicit release consumes the token, so Drop sees nothing left to do
        token.release();
        assert_eq!(limiter.outstanding(), 0);
    }

    #[test]
    fn test_tokens_cross_threads() {
        let limiter = OutstandingMoveLimiter::new(64);
        let tokens: Vec<_> = (0..32).map(|_| limiter.begin_operation()).collect();
        assert_eq!(limiter.outstanding(), 32);

        let handle = std::thread::spawn(move || drop(tokens));
        assert!(handle.join().is_ok());
        assert_eq!(limiter.outstanding(), 0);
    }

    #[test]
    fn test_detached_token_is_inert() {
        let limiter = OutstandingMoveLimiter::new(1);
        drop(MoveOperationToken::detached());
        assert_eq!(limiter.outstanding(), 0);
    }
}
