//! Shared crawl progress record
//!
//! One `CrawlState` exists per service. The crawl job is the only writer of
//! status transitions and of the item table; request handlers read it
//! concurrently, and reset clears it after the cancellation handshake.
//!
//! The status lives in a `tokio::sync::watch` channel so a reset caller can
//! await the job's acknowledgement instead of spinning. The table is an
//! immutable snapshot swapped under a lock: readers clone the `Arc` and never
//! observe a partially appended row.

use crate::catalog::CatalogItem;
use crate::state::status::{status_message, CrawlStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::watch;

/// Immutable point-in-time copy of the item table
pub type Snapshot = Arc<Vec<Arc<CatalogItem>>>;

/// Consistent read of the state used to answer one request
#[derive(Debug, Clone)]
pub struct StateView {
    pub status: CrawlStatus,
    pub items: Snapshot,
    pub discovered: usize,
}

impl StateView {
    /// Status message for this view
    pub fn message(&self) -> String {
        status_message(self.status, self.items.len(), self.discovered)
    }
}

/// Status, discovered-URL counter and item table shared by the crawl job and
/// the query layer
pub struct CrawlState {
    status: watch::Sender<CrawlStatus>,
    items: RwLock<Snapshot>,
    discovered: AtomicUsize,
    persist: Mutex<()>,
}

impl CrawlState {
    /// Creates an idle state with an empty table
    pub fn new() -> Self {
        let (status, _) = watch::channel(CrawlStatus::Idle);
        Self {
            status,
            items: RwLock::new(Arc::default()),
            discovered: AtomicUsize::new(0),
            persist: Mutex::new(()),
        }
    }

    /// Installs a previously persisted table
    ///
    /// A non-empty table makes the state `Done`; an empty one leaves it `Idle`.
    pub fn restore(&self, items: Vec<CatalogItem>) {
        let count = items.len();
        self.publish(Arc::new(items.into_iter().map(Arc::new).collect()));
        self.set_discovered(count);
        self.status.send_replace(if count > 0 {
            CrawlStatus::Done
        } else {
            CrawlStatus::Idle
        });
    }

    /// Current status
    pub fn status(&self) -> CrawlStatus {
        *self.status.borrow()
    }

    /// Current table snapshot
    pub fn items(&self) -> Snapshot {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of item URLs found by the current or last crawl
    pub fn discovered(&self) -> usize {
        self.discovered.load(Ordering::Acquire)
    }

    /// Reads status, table and counter together
    pub fn view(&self) -> StateView {
        StateView {
            status: self.status(),
            items: self.items(),
            discovered: self.discovered(),
        }
    }

    /// Status message for the current state
    pub fn message(&self) -> String {
        self.view().message()
    }

    /// Moves `Idle`/`Error` to `ExtractingUrls` and clears the table
    ///
    /// Returns false, changing nothing, when a crawl may not start from the
    /// current status.
    pub fn try_begin(&self) -> bool {
        let begun = self.status.send_if_modified(|status| {
            if status.can_start() {
                *status = CrawlStatus::ExtractingUrls;
                true
            } else {
                false
            }
        });

        if begun {
            self.publish(Arc::default());
            self.set_discovered(0);
        }
        begun
    }

    /// Compare-and-set transition; fails when the status is no longer `from`
    pub fn transition(&self, from: CrawlStatus, to: CrawlStatus) -> bool {
        self.status.send_if_modified(|status| {
            if *status == from {
                *status = to;
                true
            } else {
                false
            }
        })
    }

    /// Unconditionally sets the status
    pub fn set_status(&self, status: CrawlStatus) {
        self.status.send_replace(status);
    }

    /// Asks an active crawl to stop
    ///
    /// Returns true if the status was moved to `Stopping`.
    pub fn request_stop(&self) -> bool {
        self.status.send_if_modified(|status| {
            if status.is_active() {
                *status = CrawlStatus::Stopping;
                true
            } else {
                false
            }
        })
    }

    /// Clears the table and moves to `Idle` unless a crawl holds the state
    ///
    /// Returns false, changing nothing, while the status is active or
    /// `Stopping`. The check and the change happen under the status lock, so
    /// a concurrent `try_begin` either lands before (and this fails) or after.
    pub fn try_settle_idle(&self) -> bool {
        let mut settled = false;
        self.status.send_if_modified(|status| {
            if status.is_active() || *status == CrawlStatus::Stopping {
                return false;
            }
            settled = true;
            self.publish(Arc::default());
            self.set_discovered(0);
            let changed = *status != CrawlStatus::Idle;
            *status = CrawlStatus::Idle;
            changed
        });
        settled
    }

    /// True once cancellation has been requested
    pub fn is_stopping(&self) -> bool {
        self.status() == CrawlStatus::Stopping
    }

    /// Waits until the crawl job has acknowledged a stop request
    ///
    /// Returns immediately when the status is not `Stopping`. There is no
    /// timeout: the job polls for cancellation once per item.
    pub async fn wait_while_stopping(&self) {
        let mut rx = self.status.subscribe();
        let settled = rx
            .wait_for(|status| *status != CrawlStatus::Stopping)
            .await
            .is_ok();
        if !settled {
            tracing::warn!("Crawl status channel closed while waiting for stop");
        }
    }

    /// Publishes a new table snapshot
    pub fn publish(&self, items: Snapshot) {
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    /// Records the number of item URLs found so far
    pub fn set_discovered(&self, count: usize) {
        self.discovered.store(count, Ordering::Release);
    }

    /// Empties the table and the discovered counter
    pub fn clear(&self) {
        self.publish(Arc::default());
        self.set_discovered(0);
    }

    /// Runs `f` while holding the persistence lock
    ///
    /// Saving a finished table and deleting it on reset both go through this
    /// lock, so a save that loses the race with a reset never recreates the
    /// file after it was deleted.
    pub fn exclusive<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.persist.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Subscribes to status changes
    pub fn subscribe(&self) -> watch::Receiver<CrawlStatus> {
        self.status.subscribe()
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
