//! Cancellation and deadline checks between collaborator calls
//!
//! Every collaborator call is a potential blocking point. The resolver
//! checks its guard before each one and aborts without caching anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::errors::{ResolverError, ResolverResult};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Deadline and cancellation token for one resolution call.
#[derive(Debug, Clone, Default)]
pub struct ResolveGuard {
    deadline: Option<Instant>,
    token: Option<CancelToken>,
}

impl ResolveGuard {
    /// A guard that never aborts.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Fails if the call was cancelled or ran past its deadline.
    ///
    /// `stage` names the step about to run.
    pub fn checkpoint(&self, stage: &'static str) -> ResolverResult<()> {
        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ResolverError::Cancelled(stage));
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(ResolverError::DeadlineExceeded(stage));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_guard_passes() {
        assert!(ResolveGuard::unbounded().checkpoint("load").is_ok());
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let token = CancelToken::new();
        let guard = ResolveGuard::unbounded().with_token(token.clone());
        assert!(guard.checkpoint("load").is_ok());

        token.cancel();
        assert_eq!(
            guard.checkpoint("load"),
            Err(ResolverError::Cancelled("load"))
        );
    }

    #[test]
    fn test_past_deadline_aborts() {
        let guard = ResolveGuard::unbounded().with_deadline(Instant::now());
        assert_eq!(
            guard.checkpoint("children"),
            Err(ResolverError::DeadlineExceeded("children"))
        );
    }

    #[test]
    fn test_future_deadline_passes() {
        let guard = ResolveGuard::unbounded().with_timeout(Duration::from_secs(60));
        assert!(guard.checkpoint("children").is_ok());
    }
}
