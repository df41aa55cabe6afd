//! Uniform per-panel view state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::{ErrorKind, PanelError, PayloadDigest};

/// Lifecycle stage of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PanelStatus {
    /// Created, no fetch attempted yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The latest fetch succeeded and its view is available.
    Ready,
    /// The latest fetch failed.
    Error,
}

impl PanelStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `Loading -> Loading` is a refresh superseding one still in flight.
    /// `Idle` can only be left through a fetch attempt.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Loading | Self::Ready | Self::Error, Self::Loading)
                | (Self::Loading, Self::Ready | Self::Error)
        )
    }
}

/// A derived view together with the payload it was computed from.
#[derive(Debug)]
pub struct Loaded<T> {
    /// The derived view, shared with every snapshot of this state.
    pub view: Arc<T>,
    /// Digest of the raw payload `view` was derived from.
    pub digest: PayloadDigest,
    /// When the fetch that produced this view settled.
    pub updated_at: DateTime<Utc>,
}

impl<T> Clone for Loaded<T> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            digest: self.digest.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// What went wrong on the latest fetch, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelFailure {
    pub kind: ErrorKind,
    /// User-facing message.
    pub message: String,
    /// Underlying error text, for logs and verbose output.
    pub detail: String,
}

impl From<&PanelError> for PanelFailure {
    fn from(error: &PanelError) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
            detail: error.to_string(),
        }
    }
}

/// State of one panel: status, the last good view, and the last failure.
///
/// `data` is kept while a refresh is [`PanelStatus::Loading`] so the panel
/// can keep showing it (see [`PanelViewState::is_stale`]); it is cleared
/// when a fetch fails. It is only ever replaced by a fully derived view.
#[derive(Debug)]
pub struct PanelViewState<T> {
    status: PanelStatus,
    data: Option<Loaded<T>>,
    failure: Option<PanelFailure>,
}

impl<T> Clone for PanelViewState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl<T> Default for PanelViewState<T> {
    fn default() -> Self {
        Self {
            status: PanelStatus::Idle,
            data: None,
            failure: None,
        }
    }
}

impl<T> PanelViewState<T> {
    #[must_use]
    pub const fn status(&self) -> PanelStatus {
        self.status
    }

    /// The current view, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref().map(|l| l.view.as_ref())
    }

    #[must_use]
    pub const fn loaded(&self) -> Option<&Loaded<T>> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&PanelFailure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    /// `true` while a refresh is in flight and an older view is shown.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self.status, PanelStatus::Loading) && self.data.is_some()
    }

    pub(crate) fn begin_loading(&mut self) -> bool {
        if !self.transition(PanelStatus::Loading) {
            return false;
        }
        self.failure = None;
        true
    }

    pub(crate) fn ready(&mut self, loaded: Loaded<T>) -> bool {
        if !self.transition(PanelStatus::Ready) {
            return false;
        }
        self.data = Some(loaded);
        self.failure = None;
        true
    }

    pub(crate) fn fail(&mut self, failure: PanelFailure) -> bool {
        if !self.transition(PanelStatus::Error) {
            return false;
        }
        self.data = None;
        self.failure = Some(failure);
        true
    }

    fn transition(&mut self, next: PanelStatus) -> bool {
        if !self.status.can_transition_to(next) {
            log::warn!("Ignoring invalid panel transition {} -> {next}", self.status);
            return false;
        }
        self.status = next;
        true
    }
}
