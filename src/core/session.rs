//! Async driver around the reducer
//!
//! Owns the state, runs the effects the reducer asks for and feeds fetch
//! completions back in as events. History fetches follow last-request-wins:
//! a new request aborts the one in flight, and anything that still slips
//! through is dropped by the reducer's sequence check.
//!
//! Every spawned fetch reports exactly once. A task that panics or is
//! aborted before it finishes sends a [`FetchError::TaskFailed`] instead, so
//! [`Session::settle`] never waits on a result that cannot arrive.

use crate::core::error::FetchError;
use crate::core::source::RateSource;
use crate::core::state::{AppState, Effect, Event, HistoryRequest, TableStatus};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct Session<S: RateSource + 'static> {
    source: Arc<S>,
    state: AppState,
    rng: StdRng,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    table_task: Option<JoinHandle<()>>,
    history_task: Option<JoinHandle<()>>,
}

impl<S: RateSource + 'static> Session<S> {
    pub fn new(source: Arc<S>, initial: AppState) -> Self {
        Self::with_rng(source, initial, StdRng::from_entropy())
    }

    pub fn with_rng(source: Arc<S>, initial: AppState, rng: StdRng) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Session {
            source,
            state: initial,
            rng,
            events_tx,
            events_rx,
            table_task: None,
            history_task: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Spawns the rate-table fetch. Only the first call has any effect.
    pub fn start(&mut self) {
        if self.table_task.is_some() {
            return;
        }
        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        let fallback = Event::TableLoaded(Err(FetchError::TaskFailed("rate table".into())));
        self.table_task = Some(tokio::spawn(async move {
            let completion = Completion::new(tx, fallback);
            let result = source.fetch_table().await;
            completion.deliver(Event::TableLoaded(result));
        }));
    }

    /// Applies `event` and starts whatever fetches it triggers.
    pub fn dispatch(&mut self, event: Event) -> &AppState {
        let transition = std::mem::take(&mut self.state).reduce(event, &mut self.rng);
        self.state = transition.state;
        for effect in transition.effects {
            match effect {
                Effect::FetchHistory(request) => self.fetch_history(request),
            }
        }
        &self.state
    }

    /// Waits for the next fetch completion without applying it.
    ///
    /// Cancel-safe: dropping the future before it resolves loses no event.
    pub async fn recv_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    /// Waits for the next fetch completion and applies it.
    pub async fn next_event(&mut self) -> Option<&AppState> {
        let event = self.recv_event().await?;
        Some(self.dispatch(event))
    }

    /// True while a fetch the current state still waits on is outstanding.
    pub fn is_busy(&self) -> bool {
        let table_pending =
            self.table_task.is_some() && matches!(self.state.table, TableStatus::Loading);
        table_pending || self.state.loading_history
    }

    /// Processes completions until nothing is outstanding.
    pub async fn settle(&mut self) -> &AppState {
        while self.is_busy() {
            if self.next_event().await.is_none() {
                break;
            }
        }
        &self.state
    }

    fn fetch_history(&mut self, request: HistoryRequest) {
        if let Some(previous) = self.history_task.take() {
            previous.abort();
        }
        debug!(seq = request.seq, code = %request.code, "Fetching history");

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        let fallback = Event::HistoryLoaded {
            seq: request.seq,
            result: Err(FetchError::TaskFailed(format!("history of {}", request.code))),
        };
        self.history_task = Some(tokio::spawn(async move {
            let completion = Completion::new(tx, fallback);
            let result = source.fetch_history(&request.code).await;
            completion.deliver(Event::HistoryLoaded {
                seq: request.seq,
                result,
            });
        }));
    }
}

/// Sends the fetch result, or the fallback event if dropped undelivered.
///
/// Aborted history tasks therefore report too; their sequence number is
/// already stale, so the reducer ignores them.
struct Completion {
    tx: mpsc::UnboundedSender<Event>,
    fallback: Option<Event>,
}

impl Completion {
    fn new(tx: mpsc::UnboundedSender<Event>, fallback: Event) -> Self {
        Completion {
            tx,
            fallback: Some(fallback),
        }
    }

    fn deliver(mut self, event: Event) {
        self.fallback = None;
        let _ = self.tx.send(event);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            debug!("Fetch task ended without a result");
            let _ = self.tx.send(event);
        }
    }
}

impl<S: RateSource + 'static> Drop for Session<S> {
    fn drop(&mut self) {
        for task in [self.table_task.take(), self.history_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}
