//! The event tracker: an in-memory queue of events plus the flush routine that ships them.
//!
//! Queue and configuration live behind one lock. Recording only ever touches that lock, so
//! `track_event` never waits on the network. Flushing swaps the queue out under the same lock
//! and performs at most one delivery attempt; a failed batch is dropped, not re-queued.

/// Logs at `info` when the tracker is verbose, `trace` otherwise.
macro_rules! verbose {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            tracing::info!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    };
}

mod outcome;
mod shared;
mod timer;

pub use outcome::FlushOutcome;
pub use shared::{init_shared_instance, shared_instance, track_event, track_event_with_value};

use crate::config::{parse_report_url, TrackerConfig};
use crate::transport::{DeliveryError, HttpTransport, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tapp_common::{ReportPayload, TrackedEvent};
use timer::ReportTimer;
use url::Url;

struct TrackerState {
    config: TrackerConfig,
    pending: Vec<TrackedEvent>,
}

struct TrackerInner<T> {
    state: Mutex<TrackerState>,
    /// Held for the whole of a flush so batches leave in order
    flush_gate: tokio::sync::Mutex<()>,
    timer: Mutex<Option<ReportTimer>>,
    transport: T,
}

impl<T> Drop for TrackerInner<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.cancel();
        }
    }
}

/// Cheaply cloneable handle; every clone shares the same queue, configuration and timer.
pub struct EventTracker<T: Transport = HttpTransport> {
    inner: Arc<TrackerInner<T>>,
}

impl<T: Transport> Clone for EventTracker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> EventTracker<T> {
    /// Builds a tracker and, when called inside a tokio runtime, starts the report timer.
    pub fn new(config: TrackerConfig, transport: T) -> Self {
        let tracker = Self {
            inner: Arc::new(TrackerInner {
                state: Mutex::new(TrackerState {
                    config,
                    pending: Vec::new(),
                }),
                flush_gate: tokio::sync::Mutex::new(()),
                timer: Mutex::new(None),
                transport,
            }),
        };
        tracker.reschedule();
        tracker
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn track_event(&self, name: impl Into<String>) {
        self.record(name.into(), None);
    }

    pub fn track_event_with_value(&self, name: impl Into<String>, value: impl Into<String>) {
        self.record(name.into(), Some(value.into()));
    }

    fn record(&self, name: String, value: Option<String>) {
        if name.is_empty() {
            verbose!(self.be_verbose(), "Ignoring event with an empty name");
            return;
        }

        let event = TrackedEvent::new(name.clone(), value.clone());
        let (pending, verbose) = {
            let mut state = self.inner.state.lock();
            state.pending.push(event);
            (state.pending.len(), state.config.be_verbose)
        };

        verbose!(
            verbose,
            event = name.as_str(),
            value = value.as_deref(),
            pending,
            "Recorded event"
        );
    }

    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> TrackerConfig {
        self.inner.state.lock().config.clone()
    }

    pub fn unique_id(&self) -> String {
        self.inner.state.lock().config.unique_id.clone()
    }

    /// Empty ids are ignored.
    pub fn set_unique_id(&self, unique_id: impl Into<String>) {
        let unique_id = unique_id.into();
        let mut state = self.inner.state.lock();
        if unique_id.trim().is_empty() {
            let verbose = state.config.be_verbose;
            drop(state);
            verbose!(verbose, "Ignoring empty unique id");
            return;
        }
        state.config.unique_id = unique_id;
    }

    pub fn report_url(&self) -> Option<Url> {
        self.inner.state.lock().config.report_url.clone()
    }

    /// An unparsable or non-http(s) URL clears the destination, which disables delivery.
    pub fn set_report_url(&self, url: &str) {
        let parsed = parse_report_url(url);
        let mut state = self.inner.state.lock();
        let verbose = state.config.be_verbose;
        match parsed {
            Ok(url) => state.config.report_url = Some(url),
            Err(e) => {
                state.config.report_url = None;
                drop(state);
                verbose!(verbose, "{}; event delivery is disabled", e);
            }
        }
    }

    pub fn clear_report_url(&self) {
        self.inner.state.lock().config.report_url = None;
    }

    pub fn report_at_shutdown(&self) -> bool {
        self.inner.state.lock().config.report_at_shutdown
    }

    pub fn set_report_at_shutdown(&self, enabled: bool) {
        self.inner.state.lock().config.report_at_shutdown = enabled;
    }

    /// Seconds between automatic flushes
    pub fn report_interval(&self) -> f64 {
        self.inner.state.lock().config.report_interval
    }

    /// Reschedules the timer with the new period; zero or negative stops it.
    pub fn set_report_interval(&self, interval_secs: f64) {
        self.inner.state.lock().config.report_interval = interval_secs;
        self.reschedule();
    }

    pub fn be_verbose(&self) -> bool {
        self.inner.state.lock().config.be_verbose
    }

    pub fn set_be_verbose(&self, verbose: bool) {
        self.inner.state.lock().config.be_verbose = verbose;
    }

    /// Drains the queue and attempts one delivery, waiting behind any flush already in flight.
    pub async fn flush(&self) -> FlushOutcome {
        let _gate = self.inner.flush_gate.lock().await;
        self.flush_batch().await
    }

    /// Timer entry point: gives up immediately if a flush is already running.
    async fn flush_if_idle(&self) -> FlushOutcome {
        let Ok(_gate) = self.inner.flush_gate.try_lock() else {
            verbose!(self.be_verbose(), "Flush already in flight, skipping tick");
            return FlushOutcome::Skipped;
        };
        self.flush_batch().await
    }

    async fn flush_batch(&self) -> FlushOutcome {
        let (batch, unique_id, report_url, verbose) = {
            let mut state = self.inner.state.lock();
            (
                std::mem::take(&mut state.pending),
                state.config.unique_id.clone(),
                state.config.report_url.clone(),
                state.config.be_verbose,
            )
        };

        if batch.is_empty() {
            verbose!(verbose, "No pending events, nothing to send");
            return FlushOutcome::Empty;
        }

        let count = batch.len();
        let Some(url) = report_url else {
            verbose!(verbose, count, "No report URL configured, dropping batch");
            return FlushOutcome::Dropped {
                count,
                error: DeliveryError::MissingUrl,
            };
        };

        let payload = ReportPayload::new(unique_id, batch);
        verbose!(verbose, count, url = %url, "Sending batch");

        let start_time = Instant::now();
        match self.inner.transport.deliver(&url, &payload).await {
            Ok(()) => {
                verbose!(
                    verbose,
                    count,
                    elapsed = ?start_time.elapsed(),
                    "Batch delivered"
                );
                FlushOutcome::Delivered { count }
            }
            Err(error) => {
                verbose!(
                    verbose,
                    count,
                    category = error.category(),
                    elapsed = ?start_time.elapsed(),
                    "Delivery failed, dropping batch: {}",
                    error
                );
                FlushOutcome::Dropped { count, error }
            }
        }
    }

    /// Shutdown path for the host: stops the timer and, when `report_at_shutdown` is set,
    /// flushes once, giving up after `deadline`.
    pub async fn flush_and_wait(&self, deadline: Duration) -> FlushOutcome {
        self.stop_timer();

        let (enabled, verbose) = {
            let state = self.inner.state.lock();
            (state.config.report_at_shutdown, state.config.be_verbose)
        };
        if !enabled {
            verbose!(
                verbose,
                pending = self.pending_len(),
                "Shutdown reporting disabled, leaving pending events unsent"
            );
            return FlushOutcome::Disabled;
        }

        match tokio::time::timeout(deadline, self.flush()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                verbose!(verbose, ?deadline, "Shutdown flush timed out");
                FlushOutcome::TimedOut
            }
        }
    }

    /// [`Self::flush_and_wait`] with the configured `shutdown_deadline_ms`
    pub async fn shutdown(&self) -> FlushOutcome {
        let deadline = self.inner.state.lock().config.shutdown_deadline();
        self.flush_and_wait(deadline).await
    }
}

impl EventTracker<HttpTransport> {
    /// See [`shared_instance`].
    pub fn shared_instance() -> &'static EventTracker {
        shared::shared_instance()
    }
}
