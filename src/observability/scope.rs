//! ResolutionScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` when `complete()` is called
//! - Logs `{name}_FAILED` when `fail()` is called
//! - Logs `{name}_INCOMPLETE` on drop if neither was called

use std::time::Instant;

use tracing::{debug, warn};
use uuid::Uuid;

/// A scope that logs the lifecycle of one resolution call.
///
/// # Usage
///
/// ```ignore
/// let scope = ResolutionScope::new("CHILDREN_RESOLVE", &parent, context.session_id);
/// // ... do work ...
/// scope.complete(items.len());
/// ```
pub struct ResolutionScope {
    name: &'static str,
    target: String,
    session_id: Uuid,
    started: Instant,
    finished: bool,
}

impl ResolutionScope {
    /// Create a new scope. Logs `{name}_BEGIN` immediately.
    pub fn new(name: &'static str, target: impl ToString, session_id: Uuid) -> Self {
        let target = target.to_string();
        debug!(
            event = %format!("{}_BEGIN", name),
            content = %target,
            session_id = %session_id,
            "resolution started"
        );

        Self {
            name,
            target,
            session_id,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Mark the scope as successfully completed.
    pub fn complete(mut self, count: usize) {
        self.finished = true;
        debug!(
            event = %self.event("COMPLETE"),
            content = %self.target,
            session_id = %self.session_id,
            count,
            elapsed_ms = self.elapsed_ms(),
            "resolution complete"
        );
    }

    /// Mark the scope as failed.
    pub fn fail(mut self, code: &str, reason: &str) {
        self.finished = true;
        warn!(
            event = %self.event("FAILED"),
            content = %self.target,
            session_id = %self.session_id,
            code,
            reason,
            elapsed_ms = self.elapsed_ms(),
            "resolution failed"
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Event name for `phase`, e.g. `CHILDREN_RESOLVE_FAILED`.
    fn event(&self, phase: &str) -> String {
        format!("{}_{}", self.name, phase)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Drop for ResolutionScope {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                event = %self.event("INCOMPLETE"),
                content = %self.target,
                session_id = %self.session_id,
                "resolution scope dropped without completion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_starts_unfinished() {
        let scope = ResolutionScope::new("TEST", 5, Uuid::new_v4());
        assert!(!scope.is_finished());
        scope.complete(0);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ResolutionScope::new("TEST", "5_12", Uuid::new_v4());
        scope.fail("REVIEW_STORAGE_FAILURE", "disk offline");
    }

    #[test]
    fn test_event_names() {
        let scope = ResolutionScope::new("CHILDREN_RESOLVE", 1, Uuid::nil());
        assert_eq!(scope.event("COMPLETE"), "CHILDREN_RESOLVE_COMPLETE");
        assert_eq!(scope.event("FAILED"), "CHILDREN_RESOLVE_FAILED");
        assert_eq!(scope.event("INCOMPLETE"), "CHILDREN_RESOLVE_INCOMPLETE");
        scope.complete(0);
    }

    #[test]
    fn test_scope_drop_without_complete() {
        // Logs a warning, never panics
        let scope = ResolutionScope::new("TEST", 5, Uuid::nil());
        drop(scope);
    }
}
