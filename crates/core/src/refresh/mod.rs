//! Refresh coordinator
//!
//! State machine guaranteeing at most one token refresh in flight:
//!
//! ```text
//!            begin() [first 401]                 lease.settle(outcome)
//!   Idle  ─────────────────────────▶  Refreshing  ─────────────────────▶  Idle
//!                                      │    ▲
//!                     begin() [401]    └────┘  registers a waiter (FIFO)
//! ```
//!
//! The call that moves the coordinator out of `Idle` receives a
//! [`RefreshLease`] and owns the refresh request. Calls arriving while a
//! refresh is outstanding receive a [`RefreshWaiter`] and suspend until the
//! lease settles. The state lock is never held across an `.await`.

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Registration number of a waiter, increasing in registration order
pub type WaiterId = u64;

/// How an outstanding refresh settled
#[derive(Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New access credential to retry with
    Refreshed(String),
    /// Refresh failed; waiting calls fail with their original error
    Failed,
}

impl fmt::Debug for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refreshed(_) => f.write_str("Refreshed(<redacted>)"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

struct Waiter {
    id: WaiterId,
    resolver: oneshot::Sender<RefreshOutcome>,
}

enum RefreshState {
    Idle,
    Refreshing { waiters: VecDeque<Waiter> },
}

struct Inner {
    state: RefreshState,
    next_waiter_id: WaiterId,
}

/// Coordinates token refreshes across concurrent calls
pub struct RefreshCoordinator {
    inner: Mutex<Inner>,
    refreshes_started: AtomicU64,
}

/// Result of [`RefreshCoordinator::begin`]
pub enum RefreshTicket<'a> {
    /// The caller must perform the refresh and settle the lease
    Leader(RefreshLease<'a>),
    /// A refresh is already in flight; await its outcome
    Waiter(RefreshWaiter),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner { state: RefreshState::Idle, next_waiter_id: 0 }),
            refreshes_started: AtomicU64::new(0),
        }
    }

    /// Enter the refresh protocol after observing an authorization failure.
    ///
    /// `Idle` transitions to `Refreshing` and hands back the lease; while
    /// `Refreshing`, a waiter is queued behind the in-flight refresh.
    pub fn begin(&self) -> RefreshTicket<'_> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let RefreshState::Refreshing { waiters } = &mut inner.state {
            let id = inner.next_waiter_id;
            inner.next_waiter_id += 1;

            let (resolver, receiver) = oneshot::channel();
            waiters.push_back(Waiter { id, resolver });
            debug!(waiter = id, queued = waiters.len(), "Queued behind in-flight token refresh");
            return RefreshTicket::Waiter(RefreshWaiter { id, receiver });
        }

        inner.state = RefreshState::Refreshing { waiters: VecDeque::new() };
        let started = self.refreshes_started.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(refresh = started, "Token refresh started");
        RefreshTicket::Leader(RefreshLease { coordinator: self, settled: false })
    }

    /// Whether a refresh is currently outstanding
    pub fn is_refreshing(&self) -> bool {
        matches!(self.inner.lock().state, RefreshState::Refreshing { .. })
    }

    /// Number of calls currently suspended behind the refresh
    pub fn waiting(&self) -> usize {
        match &self.inner.lock().state {
            RefreshState::Refreshing { waiters } => waiters.len(),
            RefreshState::Idle => 0,
        }
    }

    /// Total refreshes started by this coordinator
    pub fn refreshes_started(&self) -> u64 {
        self.refreshes_started.load(Ordering::SeqCst)
    }

    fn settle(&self, outcome: &RefreshOutcome) -> Vec<WaiterId> {
        let waiters = {
            let mut inner = self.inner.lock();
            match mem::replace(&mut inner.state, RefreshState::Idle) {
                RefreshState::Refreshing { waiters } => waiters,
                RefreshState::Idle => VecDeque::new(),
            }
        };

        let mut released = Vec::with_capacity(waiters.len());
        for waiter in waiters {
            // A dropped receiver means that call went away; nothing to resolve.
            let _ = waiter.resolver.send(outcome.clone());
            released.push(waiter.id);
        }

        debug!(?outcome, released = released.len(), "Token refresh settled");
        released
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Obligation to settle the refresh started by [`RefreshCoordinator::begin`].
///
/// Dropping an unsettled lease settles it as [`RefreshOutcome::Failed`] so
/// queued waiters are never stranded. It does not touch the credential
/// store: a cancelled leader never learned whether the refresh token is
/// still good, so the stored pair stays and the next 401 starts a fresh
/// refresh. Signing out is left to an explicit rejection.
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Release every queued waiter, in registration order, with `outcome`
    /// and return the coordinator to `Idle`.
    ///
    /// Returns the ids of the released waiters in the order they were
    /// resolved.
    pub fn settle(mut self, outcome: RefreshOutcome) -> Vec<WaiterId> {
        self.settled = true;
        self.coordinator.settle(&outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Token refresh abandoned before settling; failing queued calls");
            self.coordinator.settle(&RefreshOutcome::Failed);
        }
    }
}

/// Handle of a call suspended behind an in-flight refresh
pub struct RefreshWaiter {
    id: WaiterId,
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl RefreshWaiter {
    pub fn id(&self) -> WaiterId {
        self.id
    }

    /// Suspend until the refresh settles
    pub async fn wait(self) -> RefreshOutcome {
        self.receiver.await.unwrap_or(RefreshOutcome::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader(coordinator: &RefreshCoordinator) -> RefreshLease<'_> {
        match coordinator.begin() {
            RefreshTicket::Leader(lease) => lease,
            RefreshTicket::Waiter(_) => panic!("expected to lead the refresh"),
        }
    }

    fn waiter(coordinator: &RefreshCoordinator) -> RefreshWaiter {
        match coordinator.begin() {
            RefreshTicket::Waiter(waiter) => waiter,
            RefreshTicket::Leader(_) => panic!("expected to wait behind the refresh"),
        }
    }

    #[test]
    fn first_caller_leads_and_later_callers_wait() {
        let coordinator = RefreshCoordinator::new();
        assert!(!coordinator.is_refreshing());

        let lease = leader(&coordinator);
        assert!(coordinator.is_refreshing());

        let _w1 = waiter(&coordinator);
        let _w2 = waiter(&coordinator);
        assert_eq!(coordinator.waiting(), 2);
        assert_eq!(coordinator.refreshes_started(), 1);

        lease.settle(RefreshOutcome::Failed);
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.waiting(), 0);
    }

    #[tokio::test]
    async fn success_resolves_waiters_in_registration_order() {
        let coordinator = RefreshCoordinator::new();
        let lease = leader(&coordinator);
        let waiters: Vec<_> = (0..4).map(|_| waiter(&coordinator)).collect();
        let ids: Vec<_> = waiters.iter().map(RefreshWaiter::id).collect();

        let released = lease.settle(RefreshOutcome::Refreshed("A2".into()));

        assert_eq!(released, ids);
        assert!(released.windows(2).all(|pair| pair[0] < pair[1]));
        for waiter in waiters {
            assert_eq!(waiter.wait().await, RefreshOutcome::Refreshed("A2".into()));
        }
    }

    #[tokio::test]
    async fn failure_is_delivered_to_every_waiter() {
        let coordinator = RefreshCoordinator::new();
        let lease = leader(&coordinator);
        let w1 = waiter(&coordinator);
        let w2 = waiter(&coordinator);

        lease.settle(RefreshOutcome::Failed);

        assert_eq!(w1.wait().await, RefreshOutcome::Failed);
        assert_eq!(w2.wait().await, RefreshOutcome::Failed);
    }

    #[tokio::test]
    async fn dropped_lease_fails_waiters() {
        let coordinator = RefreshCoordinator::new();
        let lease = leader(&coordinator);
        let w = waiter(&coordinator);

        drop(lease);

        assert!(!coordinator.is_refreshing());
        assert_eq!(w.wait().await, RefreshOutcome::Failed);
    }

    #[test]
    fn settling_returns_to_idle_so_next_failure_starts_new_refresh() {
        let coordinator = RefreshCoordinator::new();
        leader(&coordinator).settle(RefreshOutcome::Refreshed("A2".into()));

        let second = leader(&coordinator);
        assert_eq!(coordinator.refreshes_started(), 2);
        second.settle(RefreshOutcome::Failed);
    }

    #[tokio::test]
    async fn waiter_with_dropped_receiver_does_not_block_others() {
        let coordinator = RefreshCoordinator::new();
        let lease = leader(&coordinator);
        let gone = waiter(&coordinator);
        let kept = waiter(&coordinator);
        drop(gone);

        let released = lease.settle(RefreshOutcome::Refreshed("A2".into()));

        assert_eq!(released.len(), 2);
        assert_eq!(kept.wait().await, RefreshOutcome::Refreshed("A2".into()));
    }

    #[test]
    fn outcome_debug_hides_token() {
        let rendered = format!("{:?}", RefreshOutcome::Refreshed("secret-access".into()));
        assert!(!rendered.contains("secret-access"));
    }
}
