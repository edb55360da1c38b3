use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use game_core::{Snapshot, SnapshotProvider};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::Result;

/// Latest observation shared by every loop of a session.
///
/// Readers get an `Arc` to an immutable snapshot and never block writers for
/// longer than a pointer swap. Refreshes are serialized by `update`: the
/// freshness check is repeated after the lock is taken, so concurrent
/// requests inside one refresh interval trigger a single provider read.
#[derive(Debug)]
pub(crate) struct SnapshotCell {
    stored: RwLock<Stored>,
    update: Mutex<()>,
}

#[derive(Debug)]
struct Stored {
    snapshot: Arc<Snapshot>,
    fetched_at: Option<Instant>,
}

impl SnapshotCell {
    pub(crate) fn new() -> Self {
        Self {
            stored: RwLock::new(Stored {
                snapshot: Arc::new(Snapshot::default()),
                fetched_at: None,
            }),
            update: Mutex::new(()),
        }
    }

    pub(crate) fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.read().snapshot)
    }

    /// Return the stored snapshot if it is younger than `max_age`, otherwise
    /// read a new one from `provider`.
    pub(crate) async fn refresh(
        &self,
        provider: &dyn SnapshotProvider,
        max_age: Duration,
    ) -> Result<Arc<Snapshot>> {
        if let Some(fresh) = self.fresh(max_age) {
            return Ok(fresh);
        }

        let _guard = self.update.lock().await;
        if let Some(fresh) = self.fresh(max_age) {
            return Ok(fresh);
        }

        let snapshot = Arc::new(provider.fetch()?);
        let mut stored = self.stored.write().unwrap_or_else(PoisonError::into_inner);
        stored.snapshot = Arc::clone(&snapshot);
        stored.fetched_at = Some(Instant::now());
        Ok(snapshot)
    }

    /// Forget the stored snapshot so the next refresh always reads.
    pub(crate) fn invalidate(&self) {
        self.stored
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fetched_at = None;
    }

    fn fresh(&self, max_age: Duration) -> Option<Arc<Snapshot>> {
        let stored = self.read();
        let fetched_at = stored.fetched_at?;
        (fetched_at.elapsed() < max_age).then(|| Arc::clone(&stored.snapshot))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Stored> {
        self.stored.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{EnvError, Position};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        fetches: AtomicU32,
    }

    impl SnapshotProvider for CountingProvider {
        fn fetch(&self) -> std::result::Result<Snapshot, EnvError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            let mut snapshot = Snapshot::default();
            snapshot.player.position = Position::new(n as i32, 0);
            Ok(snapshot)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_read_once() {
        let cell = SnapshotCell::new();
        let provider = CountingProvider::default();
        let max_age = Duration::from_millis(20);

        let (a, b) = tokio::join!(
            cell.refresh(&provider, max_age),
            cell.refresh(&provider, max_age)
        );

        assert_eq!(provider.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap().player.position, b.unwrap().player.position);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_snapshot_is_read_again() {
        let cell = SnapshotCell::new();
        let provider = CountingProvider::default();
        let max_age = Duration::from_millis(20);

        cell.refresh(&provider, max_age).await.unwrap();
        tokio::time::advance(Duration::from_millis(25)).await;
        let second = cell.refresh(&provider, max_age).await.unwrap();

        assert_eq!(provider.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(second.player.position, Position::new(2, 0));
        assert_eq!(cell.latest().player.position, Position::new(2, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_a_read() {
        let cell = SnapshotCell::new();
        let provider = CountingProvider::default();
        let max_age = Duration::from_secs(10);

        cell.refresh(&provider, max_age).await.unwrap();
        cell.invalidate();
        cell.refresh(&provider, max_age).await.unwrap();

        assert_eq!(provider.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_errors_are_propagated() {
        struct Failing;
        impl SnapshotProvider for Failing {
            fn fetch(&self) -> std::result::Result<Snapshot, EnvError> {
                Err(EnvError::NotInGame)
            }
        }

        let cell = SnapshotCell::new();
        let result = cell.refresh(&Failing, Duration::from_millis(20)).await;
        assert!(result.is_err());
    }
}
