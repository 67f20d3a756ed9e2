//! Wire types and process plumbing shared by the tracker and the collector.

mod error;
pub mod event;
pub mod logging;
pub mod payload;

pub use error::PayloadError;
pub use event::TrackedEvent;
pub use payload::{ReportPayload, UNKNOWN_UNIQUE_ID};
