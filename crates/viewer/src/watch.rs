//! Cross-process change detection.
//!
//! The admin service bumps a single `catalog_revision` row inside every
//! mutation transaction. The watcher polls that row and broadcasts the new
//! revision whenever it changes, fanning out to SSE connections and the
//! listing-cache invalidator. A full re-fetch after any notification yields
//! the current state; no exactly-once delivery is guaranteed.

use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Buffered revisions per subscriber. Lagging only skips intermediate
/// revisions, which subscribers do not care about.
const REVISION_CHANNEL_CAPACITY: usize = 16;

/// Polls the catalog revision and broadcasts changes.
#[derive(Debug)]
pub struct RevisionWatcher {
    tx: broadcast::Sender<i64>,
    handle: JoinHandle<()>,
}

impl RevisionWatcher {
    /// Spawn the polling task.
    ///
    /// The first observed revision establishes a baseline and is not
    /// broadcast; only subsequent changes are.
    #[must_use]
    pub fn spawn(pool: SqlitePool, interval: Duration) -> Self {
        let (tx, _) = broadcast::channel(REVISION_CHANNEL_CAPACITY);
        let task_tx = tx.clone();

        let handle = tokio::spawn(async move {
            let mut last: Option<i64> = None;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let revision: Result<i64, sqlx::Error> =
                    sqlx::query_scalar("SELECT revision FROM catalog_revision WHERE id = 1")
                        .fetch_one(&pool)
                        .await;

                match revision {
                    Ok(revision) => {
                        if last.is_some_and(|seen| seen != revision) {
                            tracing::debug!(revision, "catalog revision changed");
                            let _ = task_tx.send(revision);
                        }
                        last = Some(revision);
                    }
                    Err(e) => {
                        // Transient; keep polling.
                        tracing::warn!(error = %e, "failed to poll catalog revision");
                    }
                }
            }
        });

        Self { tx, handle }
    }

    /// Open a new subscription to revision changes.
    ///
    /// The returned handle owns its lifecycle: dropping it cancels the
    /// subscription.
    #[must_use]
    pub fn subscribe(&self) -> RevisionSubscription {
        RevisionSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Drop for RevisionWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A live subscription to catalog revision changes.
#[derive(Debug)]
pub struct RevisionSubscription {
    rx: broadcast::Receiver<i64>,
}

impl RevisionSubscription {
    /// Wait for the next revision change.
    ///
    /// Skipped intermediate revisions are collapsed into the next received
    /// value. Returns `None` once the watcher is gone.
    pub async fn changed(&mut self) -> Option<i64> {
        loop {
            match self.rx.recv().await {
                Ok(revision) => return Some(revision),
                // Only the latest revision matters.
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool_with_revision_table() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE catalog_revision (id INTEGER PRIMARY KEY CHECK (id = 1), revision INTEGER NOT NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO catalog_revision (id, revision) VALUES (1, 0)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_broadcasts_revision_change() {
        let pool = pool_with_revision_table().await;
        let watcher = RevisionWatcher::spawn(pool.clone(), Duration::from_millis(10));
        let mut sub = watcher.subscribe();

        // Let the watcher establish its baseline, then bump.
        tokio::time::sleep(Duration::from_millis(50)).await;
        sqlx::query("UPDATE catalog_revision SET revision = revision + 1 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let revision = tokio::time::timeout(Duration::from_secs(2), sub.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(revision, 1);
    }

    #[tokio::test]
    async fn test_subscription_closes_when_watcher_dropped() {
        let pool = pool_with_revision_table().await;
        let watcher = RevisionWatcher::spawn(pool, Duration::from_millis(10));
        let mut sub = watcher.subscribe();
        drop(watcher);

        let next = tokio::time::timeout(Duration::from_secs(2), sub.changed())
            .await
            .unwrap();
        assert!(next.is_none());
    }
}
