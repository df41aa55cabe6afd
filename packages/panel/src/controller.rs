//! Ticketed refresh controller for a single panel.
//!
//! Every refresh takes a [`RefreshTicket`] carrying a generation number.
//! When a response settles, it is applied only if its ticket is still the
//! newest one issued and the panel has not been torn down. Superseded and
//! post-teardown results are discarded, so the panel always reflects the
//! most recently *initiated* refresh regardless of arrival order.
//!
//! State is published through a [`tokio::sync::watch`] channel; renderers
//! subscribe and read snapshots without touching the controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use ride_insights_source::{FetchError, RawPayload, RideSource};
use tokio::sync::watch;

use crate::{
    Loaded, PanelError, PanelFailure, PanelKind, PanelPipeline, PanelStatus, PanelViewState,
    PayloadDigest,
};

/// Proof that a refresh was started; required to settle it.
#[derive(Debug)]
#[must_use = "a refresh ticket must be settled or the panel stays Loading"]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns one panel's pipeline and view state.
pub struct PanelController<P: PanelPipeline> {
    pipeline: P,
    generation: AtomicU64,
    torn_down: AtomicBool,
    state: watch::Sender<PanelViewState<P::View>>,
}

impl<P: PanelPipeline> PanelController<P> {
    /// Creates an idle panel.
    pub fn new(pipeline: P) -> Self {
        let (state, _) = watch::channel(PanelViewState::default());
        Self {
            pipeline,
            generation: AtomicU64::new(0),
            torn_down: AtomicBool::new(false),
            state,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.pipeline.kind()
    }

    /// Receiver that observes every state change of this panel.
    pub fn subscribe(&self) -> watch::Receiver<PanelViewState<P::View>> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PanelViewState<P::View> {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> PanelStatus {
        self.state.borrow().status()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// First fetch after creation.
    ///
    /// Returns `false` without fetching if the panel has already been
    /// mounted or torn down.
    pub async fn mount(&self, source: &dyn RideSource) -> bool {
        if self.status() != PanelStatus::Idle {
            log::debug!("[{}] Already mounted", self.kind());
            return false;
        }
        self.refresh(source).await
    }

    /// Fetches and derives a fresh view.
    ///
    /// Returns `true` if this refresh's outcome was applied, `false` if it
    /// was superseded by a newer refresh or the panel was torn down.
    pub async fn refresh(&self, source: &dyn RideSource) -> bool {
        let Some(ticket) = self.begin_refresh() else {
            return false;
        };
        let outcome = source.fetch(self.kind().endpoint()).await;
        self.settle(ticket, outcome)
    }

    /// Enters `Loading` and issues a ticket that supersedes all earlier ones.
    ///
    /// Returns `None` once the panel has been torn down.
    pub fn begin_refresh(&self) -> Option<RefreshTicket> {
        let mut issued = None;
        self.state.send_if_modified(|state| {
            if self.is_torn_down() {
                return false;
            }
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            issued = Some(RefreshTicket { generation });
            state.begin_loading()
        });

        match &issued {
            Some(ticket) => {
                log::debug!("[{}] Loading (refresh #{})", self.kind(), ticket.generation);
            }
            None => log::debug!("[{}] Refresh ignored after teardown", self.kind()),
        }
        issued
    }

    /// Applies a fetch outcome if `ticket` is still current.
    ///
    /// Derivation runs before the state changes, so the panel never holds
    /// a partially derived view. The ticket is checked again under the
    /// state lock after derivation.
    pub fn settle(&self, ticket: RefreshTicket, outcome: Result<RawPayload, FetchError>) -> bool {
        let kind = self.kind();
        let generation = ticket.generation;

        if !self.is_current(&ticket) {
            return false;
        }

        let settled = outcome
            .map_err(PanelError::from)
            .and_then(|payload| self.derive(&payload))
            .map_err(|e| PanelFailure::from(&e));
        let summary = settled
            .as_ref()
            .map(|loaded| loaded.digest.clone())
            .map_err(|failure| failure.detail.clone());

        let applied = self.state.send_if_modified(|state| {
            if !self.is_current(&ticket) {
                return false;
            }
            match settled {
                Ok(loaded) => state.ready(loaded),
                Err(failure) => state.fail(failure),
            }
        });

        if applied {
            match summary {
                Ok(digest) => {
                    log::debug!("[{kind}] Ready (refresh #{generation}, payload {digest})");
                }
                Err(detail) => log::warn!("[{kind}] Refresh #{generation} failed: {detail}"),
            }
        }
        applied
    }

    /// Stops the panel. In-flight and future refreshes no longer touch
    /// its state once this returns.
    pub fn teardown(&self) {
        let mut newly = false;
        self.state.send_if_modified(|_| {
            newly = !self.torn_down.swap(true, Ordering::AcqRel);
            false
        });
        if newly {
            log::debug!("[{}] Torn down", self.kind());
        }
    }

    fn is_current(&self, ticket: &RefreshTicket) -> bool {
        let kind = self.kind();
        if self.is_torn_down() {
            log::debug!(
                "[{kind}] Discarding refresh #{} after teardown",
                ticket.generation
            );
            return false;
        }

        let latest = self.generation.load(Ordering::Acquire);
        if ticket.generation != latest {
            log::debug!(
                "[{kind}] Discarding refresh #{} superseded by #{latest}",
                ticket.generation
            );
            return false;
        }
        true
    }

    fn derive(&self, payload: &RawPayload) -> Result<Loaded<P::View>, PanelError> {
        let digest = PayloadDigest::of(payload);

        let cached = self
            .state
            .borrow()
            .loaded()
            .filter(|loaded| loaded.digest == digest)
            .map(|loaded| Arc::clone(&loaded.view));

        let view = if let Some(view) = cached {
            log::debug!("[{}] Payload {digest} unchanged, reusing view", self.kind());
            view
        } else {
            Arc::new(self.pipeline.derive(payload)?)
        };

        Ok(Loaded {
            view,
            digest,
            updated_at: Utc::now(),
        })
    }
}
