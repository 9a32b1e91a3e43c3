//! Expiry/validity filter
//!
//! Storage may lag real-time expiry: a version can keep its `Published`
//! status after its stop-publish time has passed. Such a version is
//! logically expired and must not be shown to reviewers.

use chrono::{DateTime, Utc};

use crate::content::{VersionState, VersionStatus};

/// Stateless expiry check.
pub struct ExpiryFilter;

impl ExpiryFilter {
    /// True iff the version is published with a stop-publish time before `now`.
    pub fn is_expired(state: &VersionState, now: DateTime<Utc>) -> bool {
        state.status == VersionStatus::Published
            && state.stop_publish.is_some_and(|stop| stop < now)
    }

    /// `is_expired` against the current wall clock.
    pub fn is_expired_now(state: &VersionState) -> bool {
        Self::is_expired(state, Utc::now())
    }
}
