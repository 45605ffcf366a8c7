use crate::engine::{Failure, FailureKind, store::PostStore};
use fahrplan_common::util::PollInterval;
use fahrplan_gateway::client::RemoteGateway;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the sync loop is currently doing, for the UI to disclose. `Failed`
/// is transient: the next successful pull returns to `Idle`.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Failed(Failure),
}

/// Clonable handle to a running [`SyncLoop`].
#[derive(Clone, Debug)]
pub struct SyncHandle {
    trigger_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<SyncStatus>,
}

impl SyncHandle {
    /// Asks for a pull outside the regular cadence, e.g. right after a
    /// submission. Requests arriving while a pull is already pending or in
    /// flight coalesce into one.
    pub fn request_sync(&self) {
        if self.trigger_tx.try_send(()).is_err() {
            debug!("Sync already requested; coalescing");
        }
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status_rx.borrow().clone()
    }

    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }
}

/// Periodically pulls the remote snapshot and reconciles the store with it.
///
/// A single cooperative task, so reconciliations are strictly serialized:
/// while one pull is in flight no second one can start, interval ticks that
/// would land mid-pull are skipped, and on-demand triggers are drained once
/// the pull completes. After cancellation nothing is applied to the store.
pub struct SyncLoop<G: ?Sized> {
    gateway: Arc<G>,
    store: PostStore,
    interval: PollInterval,
    cancel: CancellationToken,
    trigger_rx: mpsc::Receiver<()>,
    status_tx: watch::Sender<SyncStatus>,
}

impl<G: RemoteGateway + ?Sized> SyncLoop<G> {
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        store: PostStore,
        interval: PollInterval,
        cancel: CancellationToken,
    ) -> (Self, SyncHandle) {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);

        let sync_loop = Self {
            gateway,
            store,
            interval,
            cancel,
            trigger_rx,
            status_tx,
        };
        let handle = SyncHandle {
            trigger_tx,
            status_rx,
        };

        (sync_loop, handle)
    }

    /// Runs until the cancellation token fires. The first pull happens
    /// immediately.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval.get());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
                Some(()) = self.trigger_rx.recv() => {}
            }

            self.pull().await;
            if self.cancel.is_cancelled() {
                break;
            }

            // Ticks and triggers that piled up while the pull was in flight
            // are already answered by the snapshot it applied: skip them
            // instead of draining a backlog of immediate re-pulls.
            ticker.reset();
            while self.trigger_rx.try_recv().is_ok() {}
        }

        debug!("Sync loop stopped");
    }

    async fn pull(&self) {
        self.status_tx.send_replace(SyncStatus::Syncing);

        let result = self.gateway.list_posts().await;
        if self.cancel.is_cancelled() {
            return;
        }

        match result {
            Ok(snapshot) => {
                let summary = self.store.reconcile(snapshot);
                if summary.rejected > 0 {
                    warn!(
                        rejected = summary.rejected,
                        "Snapshot contained entries that could not be applied"
                    );
                    self.status_tx.send_replace(SyncStatus::Failed(Failure {
                        kind: FailureKind::Partial,
                        message: format!(
                            "{} entries in the latest snapshot were skipped",
                            summary.rejected
                        ),
                    }));
                } else {
                    self.status_tx.send_replace(SyncStatus::Idle);
                }
            }
            Err(error) => {
                warn!(%error, "Could not pull the remote snapshot");
                self.status_tx.send_replace(SyncStatus::Failed(Failure {
                    kind: FailureKind::Network,
                    message: error.to_string(),
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockGateway;
    use fahrplan_common::model::post::PostStatus;
    use fahrplan_gateway::payload::Snapshot;
    use std::time::Duration;
    use time::macros::datetime;

    fn one_hour() -> PollInterval {
        PollInterval::new_unchecked(Duration::from_secs(3600))
    }

    async fn wait_for_idle(handle: &SyncHandle) {
        let mut status = handle.watch();
        status
            .wait_for(|status| !matches!(status, SyncStatus::Syncing))
            .await
            .expect("sync loop dropped its status channel");
    }

    #[tokio::test(start_paused = true)]
    async fn first_pull_happens_immediately_and_reconciles() {
        let gateway = Arc::new(MockGateway::with_snapshot(Snapshot {
            posts: vec![MockGateway::post(
                1,
                datetime!(2025-03-01 10:00 UTC),
                PostStatus::Pending,
            )],
            rejected: 0,
        }));
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) =
            SyncLoop::new(Arc::clone(&gateway), store.clone(), one_hour(), cancel.clone());
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        status
            .wait_for(|status| *status == SyncStatus::Idle && gateway.list_calls() > 0)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(gateway.list_calls(), 1);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_during_a_pending_pull_coalesce_into_one_call() {
        let gateway = Arc::new(
            MockGateway::with_snapshot(Snapshot::default())
                .delaying(Duration::from_secs(60)),
        );
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) =
            SyncLoop::new(Arc::clone(&gateway), store.clone(), one_hour(), cancel.clone());
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        status
            .wait_for(|status| *status == SyncStatus::Syncing)
            .await
            .unwrap();

        // Both requests land while the first pull is still in flight.
        handle.request_sync();
        handle.request_sync();
        wait_for_idle(&handle).await;

        // They were answered by the pull that was already running.
        assert_eq!(gateway.list_calls(), 1);

        // A request issued while idle does start a fresh pull.
        handle.request_sync();
        status
            .wait_for(|_| gateway.list_calls() >= 2)
            .await
            .unwrap();

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_landing_mid_pull_are_skipped_not_queued() {
        // The pull takes twelve poll intervals; none of the ticks that pass
        // in that time may start a second pull.
        let gateway = Arc::new(
            MockGateway::with_snapshot(Snapshot::default())
                .delaying(Duration::from_secs(60)),
        );
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) = SyncLoop::new(
            Arc::clone(&gateway),
            store.clone(),
            PollInterval::new_unchecked(Duration::from_secs(5)),
            cancel.clone(),
        );
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        status
            .wait_for(|status| *status == SyncStatus::Syncing)
            .await
            .unwrap();
        wait_for_idle(&handle).await;

        assert_eq!(gateway.list_calls(), 1);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn a_pull_completing_after_teardown_is_discarded() {
        let gateway = Arc::new(
            MockGateway::with_snapshot(Snapshot {
                posts: vec![MockGateway::post(
                    1,
                    datetime!(2025-03-01 10:00 UTC),
                    PostStatus::Pending,
                )],
                rejected: 0,
            })
            .delaying(Duration::from_secs(60)),
        );
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) =
            SyncLoop::new(Arc::clone(&gateway), store.clone(), one_hour(), cancel.clone());
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        status
            .wait_for(|status| *status == SyncStatus::Syncing)
            .await
            .unwrap();
        cancel.cancel();
        task.await.unwrap();

        // The pull resolved after cancellation; its snapshot was dropped.
        assert_eq!(gateway.list_calls(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn a_failed_pull_leaves_the_store_unchanged_and_retries() {
        let gateway = Arc::new(MockGateway::failing());
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) =
            SyncLoop::new(Arc::clone(&gateway), store.clone(), one_hour(), cancel.clone());
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        let failure = status
            .wait_for(|status| matches!(status, SyncStatus::Failed(_)))
            .await
            .unwrap()
            .clone();
        let SyncStatus::Failed(failure) = failure else {
            unreachable!()
        };

        assert_eq!(failure.kind, FailureKind::Network);
        assert!(store.is_empty());

        // The loop keeps ticking: an on-demand trigger retries the pull.
        handle.request_sync();
        status
            .wait_for(|_| gateway.list_calls() >= 2)
            .await
            .unwrap();

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn a_partial_snapshot_applies_and_surfaces_partial_failure() {
        let gateway = Arc::new(MockGateway::with_snapshot(Snapshot {
            posts: vec![MockGateway::post(
                1,
                datetime!(2025-03-01 10:00 UTC),
                PostStatus::Pending,
            )],
            rejected: 2,
        }));
        let store = PostStore::new(time::UtcOffset::UTC);
        let cancel = CancellationToken::new();
        let (sync_loop, handle) =
            SyncLoop::new(Arc::clone(&gateway), store.clone(), one_hour(), cancel.clone());
        let task = tokio::spawn(sync_loop.run());

        let mut status = handle.watch();
        let failed = status
            .wait_for(|status| matches!(status, SyncStatus::Failed(_)))
            .await
            .unwrap()
            .clone();
        let SyncStatus::Failed(failure) = failed else {
            unreachable!()
        };

        assert_eq!(failure.kind, FailureKind::Partial);
        // The valid entry was still applied.
        assert_eq!(store.len(), 1);

        cancel.cancel();
        task.await.unwrap();
    }
}
