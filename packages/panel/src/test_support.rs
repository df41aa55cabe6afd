//! In-memory [`RideSource`] implementations for controller tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ride_insights_source::{FetchError, RawPayload, RideSource};
use ride_insights_source_models::Endpoint;
use tokio::sync::oneshot;

type Outcome = Result<RawPayload, FetchError>;

/// Answers each fetch with the next queued channel, so a test decides when
/// and in which order responses settle.
#[derive(Default)]
pub struct ScriptedSource {
    pending: Mutex<VecDeque<oneshot::Receiver<Outcome>>>,
}

impl ScriptedSource {
    /// Queues a response slot for the next fetch and returns its sender.
    pub fn expect_fetch(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }
}

#[async_trait]
impl RideSource for ScriptedSource {
    async fn fetch(&self, endpoint: Endpoint) -> Outcome {
        let rx = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected fetch of {endpoint}"));
        rx.await.expect("response sender dropped")
    }
}

/// Answers immediately from a fixed table. Missing endpoints fail with
/// HTTP 404, listed statuses fail with that status.
#[derive(Default)]
pub struct StaticSource {
    payloads: BTreeMap<Endpoint, RawPayload>,
    failures: BTreeMap<Endpoint, u16>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn with_payload(mut self, endpoint: Endpoint, payload: RawPayload) -> Self {
        self.payloads.insert(endpoint, payload);
        self
    }

    pub fn with_failure(mut self, endpoint: Endpoint, status: u16) -> Self {
        self.failures.insert(endpoint, status);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RideSource for StaticSource {
    async fn fetch(&self, endpoint: Endpoint) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(&status) = self.failures.get(&endpoint) {
            return Err(FetchError::Server { endpoint, status });
        }
        self.payloads
            .get(&endpoint)
            .cloned()
            .ok_or(FetchError::Server {
                endpoint,
                status: 404,
            })
    }
}
