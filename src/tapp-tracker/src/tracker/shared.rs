use super::EventTracker;
use crate::config::{ConfigLoader, TrackerConfig};
use crate::transport::HttpTransport;
use once_cell::sync::OnceCell;
use tracing::warn;

static SHARED: OnceCell<EventTracker> = OnceCell::new();

/// The process-wide tracker, built from defaults and `TAPP_*` environment variables on first
/// use unless [`init_shared_instance`] ran first.
///
/// Prefer constructing an [`EventTracker`] at the composition root and passing it around;
/// this accessor exists for call sites that cannot be handed one.
pub fn shared_instance() -> &'static EventTracker {
    SHARED.get_or_init(|| {
        let config = ConfigLoader::load_default_config().unwrap_or_else(|e| {
            warn!("Falling back to default tracker settings: {:#}", e);
            TrackerConfig::default()
        });
        let transport = HttpTransport::try_new(config.request_timeout()).unwrap_or_else(|e| {
            warn!("Falling back to a default HTTP client: {:#}", e);
            HttpTransport::default()
        });
        EventTracker::new(config, transport)
    })
}

/// Installs `tracker` as the shared instance. Fails, handing the tracker back, if the shared
/// instance already exists.
pub fn init_shared_instance(tracker: EventTracker) -> Result<&'static EventTracker, EventTracker> {
    SHARED.set(tracker)?;
    Ok(shared_instance())
}

pub fn track_event(name: impl Into<String>) {
    shared_instance().track_event(name);
}

pub fn track_event_with_value(name: impl Into<String>, value: impl Into<String>) {
    shared_instance().track_event_with_value(name, value);
}
