use super::{EventTracker, TrackerInner};
use crate::transport::Transport;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub(super) struct ReportTimer {
    token: CancellationToken,
}

impl ReportTimer {
    pub(super) fn cancel(self) {
        self.token.cancel();
    }
}

impl<T: Transport> EventTracker<T> {
    /// Replaces the running timer with one using the current `report_interval`.
    ///
    /// The first tick comes one full period after this call. A flush already in flight is
    /// left to finish.
    pub(super) fn reschedule(&self) {
        let mut timer = self.inner.timer.lock();
        if let Some(previous) = timer.take() {
            previous.cancel();
        }

        let (period, verbose) = {
            let state = self.inner.state.lock();
            (state.config.report_period(), state.config.be_verbose)
        };

        let Some(period) = period else {
            verbose!(verbose, "Periodic reporting disabled");
            return;
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!("No tokio runtime available, periodic reporting stays off");
            return;
        };

        let token = CancellationToken::new();
        runtime.spawn(run_timer(
            Arc::downgrade(&self.inner),
            period,
            token.clone(),
        ));
        verbose!(verbose, ?period, "Periodic reporting scheduled");

        *timer = Some(ReportTimer { token });
    }

    pub(super) fn stop_timer(&self) {
        if let Some(timer) = self.inner.timer.lock().take() {
            timer.cancel();
        }
    }

    pub fn periodic_reporting_active(&self) -> bool {
        self.inner.timer.lock().is_some()
    }
}

async fn run_timer<T: Transport>(
    tracker_ref: Weak<TrackerInner<T>>,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let Some(inner) = tracker_ref.upgrade() else {
                    break;
                };
                EventTracker { inner }.flush_if_idle().await;
            }
        }
    }
}
