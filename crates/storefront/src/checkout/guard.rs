//! Duplicate submission guard.
//!
//! Keeps at most one checkout submission in flight per session. A claim is
//! held by a [`SubmissionClaim`] and released when it is dropped, so a handler
//! cancelled by a client disconnect frees the session too. Entries also expire
//! after a TTL.

use std::time::Duration;

use moka::future::Cache;

/// In-flight checkout submissions, keyed by session id.
#[derive(Clone)]
pub struct SubmissionGuard {
    in_flight: Cache<String, ()>,
}

impl SubmissionGuard {
    /// Create a guard whose claims expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            in_flight: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Claim the submission slot for `key`.
    ///
    /// Returns `None` if another submission for the same key holds it.
    pub async fn try_acquire(&self, key: &str) -> Option<SubmissionClaim> {
        let fresh = self
            .in_flight
            .entry(key.to_owned())
            .or_insert(())
            .await
            .is_fresh();

        fresh.then(|| SubmissionClaim {
            in_flight: self.in_flight.clone(),
            key: Some(key.to_owned()),
        })
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }
}

impl std::fmt::Debug for SubmissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionGuard")
            .field("in_flight", &self.in_flight.entry_count())
            .finish()
    }
}

/// A held submission slot.
///
/// Prefer [`SubmissionClaim::release`]; dropping the claim releases the slot
/// from a spawned task.
#[must_use = "the slot is released as soon as the claim is dropped"]
pub struct SubmissionClaim {
    in_flight: Cache<String, ()>,
    key: Option<String>,
}

impl SubmissionClaim {
    /// Release the slot now.
    pub async fn release(mut self) {
        if let Some(key) = self.key.take() {
            self.in_flight.invalidate(&key).await;
        }
    }
}

impl Drop for SubmissionClaim {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let in_flight = self.in_flight.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { in_flight.invalidate(&key).await });
            }
            // Outside a runtime the TTL clears the entry
            Err(_) => tracing::warn!(key = %key, "Submission claim dropped outside a runtime"),
        }
    }
}

impl std::fmt::Debug for SubmissionClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClaim")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_acquire_blocked_until_release() {
        let guard = SubmissionGuard::new(Duration::from_secs(30));

        let claim = guard.try_acquire("session-a").await;
        assert!(claim.is_some());
        assert!(guard.try_acquire("session-a").await.is_none());
        assert!(guard.is_in_flight("session-a"));

        if let Some(claim) = claim {
            claim.release().await;
        }
        assert!(!guard.is_in_flight("session-a"));
        assert!(guard.try_acquire("session-a").await.is_some());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let guard = SubmissionGuard::new(Duration::from_secs(30));

        let a = guard.try_acquire("session-a").await;
        let b = guard.try_acquire("session-b").await;
        assert!(a.is_some());
        assert!(b.is_some());
    }

    #[tokio::test]
    async fn test_dropped_claim_is_released() {
        let guard = SubmissionGuard::new(Duration::from_secs(30));

        drop(guard.try_acquire("session-a").await);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!guard.is_in_flight("session-a"));
        assert!(guard.try_acquire("session-a").await.is_some());
    }

    #[tokio::test]
    async fn test_cancelled_holder_releases_claim() {
        let guard = SubmissionGuard::new(Duration::from_secs(30));

        let holder = {
            let guard = guard.clone();
            tokio::spawn(async move {
                let _claim = guard.try_acquire("session-a").await;
                std::future::pending::<()>().await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(guard.is_in_flight("session-a"));

        holder.abort();
        assert!(holder.await.is_err_and(|e| e.is_cancelled()));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!guard.is_in_flight("session-a"));
    }

    #[tokio::test]
    async fn test_concurrent_acquire_admits_one() {
        let guard = SubmissionGuard::new(Duration::from_secs(30));

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.try_acquire("session-a").await })
            })
            .collect();

        // Claims are kept alive until every attempt has finished
        let mut claims = Vec::new();
        for attempt in attempts {
            if let Ok(Some(claim)) = attempt.await {
                claims.push(claim);
            }
        }
        assert_eq!(claims.len(), 1);
    }
}
