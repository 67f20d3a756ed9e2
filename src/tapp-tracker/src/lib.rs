//! Client-side event tracker.
//!
//! ```rust,no_run
//! # use std::time::Duration;
//! # use tapp_tracker::config::TrackerConfig;
//! # use tapp_tracker::transport::HttpTransport;
//! # use tapp_tracker::EventTracker;
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = TrackerConfig::default();
//! let tracker = EventTracker::new(config.clone(), HttpTransport::try_new(config.request_timeout())?);
//! tracker.set_report_url("https://collector.example.com/events");
//!
//! tracker.track_event("app_open");
//! tracker.track_event_with_value("purchase", "9.99");
//!
//! // during the host's own termination sequence
//! tracker.flush_and_wait(Duration::from_secs(5)).await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod tracker;
pub mod transport;

pub use tracker::{
    init_shared_instance, shared_instance, track_event, track_event_with_value, EventTracker,
    FlushOutcome,
};
