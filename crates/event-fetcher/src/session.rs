//! Non-blocking refreshes for a map view.
//!
//! A [`RefreshSession`] runs each fetch on its own tokio task so the caller
//! never waits on the network. Starting a new refresh aborts the one still
//! in flight, which keeps a slow response for an old viewport from landing
//! on top of a newer one. [`MapState`] is the receiving end: it swaps in the
//! markers of a successful fetch and keeps the current ones on failure.

use chrono::{DateTime, Utc};
use shared_types::{Event, MarkerLayer, Viewport};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::client::EventSource;
use crate::error::{ErrorKind, FetchEventsError};
use crate::query::EventQuery;

/// Result of one refresh, tagged with the request that produced it.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub viewport: Viewport,
    pub result: Result<Vec<Event>, FetchEventsError>,
}

pub struct RefreshSession {
    source: Arc<dyn EventSource>,
    generation: u64,
    in_flight: Option<JoinHandle<RefreshOutcome>>,
}

impl RefreshSession {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            generation: 0,
            in_flight: None,
        }
    }

    /// Start fetching events for `viewport`, aborting any fetch still running.
    ///
    /// Must be called from within a tokio runtime. Returns the generation the
    /// outcome will carry.
    pub fn refresh(&mut self, viewport: Viewport) -> u64 {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        tracing::debug!("Starting refresh {} for {:?}", generation, viewport);

        self.in_flight = Some(tokio::spawn(async move {
            let query = EventQuery::from_viewport(&viewport);
            let result = source.fetch_events(&query).await;
            RefreshOutcome {
                generation,
                viewport,
                result,
            }
        }));

        generation
    }

    /// Abort the in-flight fetch, if any. Its outcome is never delivered.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling refresh {}", self.generation);
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Generation of the most recent refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the in-flight fetch to finish.
    ///
    /// Returns `None` straight away when nothing is in flight, and when the
    /// fetch task panicked. Cancel safe: dropping the future leaves the fetch
    /// running.
    pub async fn next_outcome(&mut self) -> Option<RefreshOutcome> {
        let handle = self.in_flight.as_mut()?;
        let joined = handle.await;
        self.in_flight = None;

        match joined {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!("Refresh task {} failed: {}", self.generation, e);
                None
            }
        }
    }
}

impl Drop for RefreshSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Error from the latest failed refresh, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Markers currently displayed by the map view.
#[derive(Debug, Default)]
pub struct MapState {
    overlay: Option<MarkerLayer>,
    events: Vec<Event>,
    fetched_at: Option<DateTime<Utc>>,
    last_error: Option<RefreshFailure>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a refresh outcome. Returns `true` when the markers were replaced.
    ///
    /// Outcomes are applied in arrival order, the last one wins. Generations
    /// are per session and are not compared here; a session never delivers
    /// an outcome for a refresh it superseded. A failed outcome records the
    /// error and leaves the current markers in place.
    pub fn apply(&mut self, outcome: RefreshOutcome) -> bool {
        match outcome.result {
            Ok(events) => {
                self.overlay = MarkerLayer::from_events(&events).into_overlay();
                self.events = events;
                self.fetched_at = Some(Utc::now());
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::warn!("Refresh {} failed: {}", outcome.generation, e);
                self.last_error = Some(RefreshFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// The attached marker layer; `None` until a fetch returned events.
    pub fn overlay(&self) -> Option<&MarkerLayer> {
        self.overlay.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn last_error(&self) -> Option<&RefreshFailure> {
        self.last_error.as_ref()
    }
}
