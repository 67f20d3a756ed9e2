use crate::error::PayloadError;
use crate::event::TrackedEvent;
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// Substituted when a report arrives without a usable unique id
pub const UNKNOWN_UNIQUE_ID: &str = "Unknown";

const LEGACY_UNIQUE_ID_KEY: &str = "unique_id";
const LEGACY_EVENT_SUFFIX: &str = "[]";

/// A batch of events as it travels from the tracker to the collector.
///
/// Events are kept oldest first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload {
    pub unique_id: String,
    pub events: Vec<TrackedEvent>,
}

impl ReportPayload {
    pub fn new(unique_id: impl Into<String>, events: Vec<TrackedEvent>) -> Self {
        Self {
            unique_id: unique_id.into(),
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn unique_id_or_unknown(&self) -> &str {
        match self.unique_id.trim() {
            "" => UNKNOWN_UNIQUE_ID,
            id => id,
        }
    }

    pub fn from_json(body: &[u8]) -> Result<Self, PayloadError> {
        let payload: ReportPayload = serde_json::from_slice(body)?;

        if let Some(index) = payload.events.iter().position(|e| e.name().is_empty()) {
            return Err(PayloadError::EmptyEventName { index });
        }

        Ok(payload)
    }

    /// Decodes the legacy `unique_id=<id>&<event>[]=<value>&...` body.
    ///
    /// The raw body is walked record by record so event order survives. The unique id is
    /// form-decoded (`+` is a space); event names and values are percent-decoded only. Records without `=`,
    /// keys without the `[]` suffix and empty event names are skipped. Legacy clients send no
    /// per-event time, so every event is stamped with `received_at`.
    pub fn from_legacy_form(body: &str, received_at: DateTime<Utc>) -> Self {
        let mut unique_id = String::new();
        let mut events = Vec::new();

        for record in body.split('&') {
            let Some((raw_key, raw_value)) = record.split_once('=') else {
                continue;
            };
            let key = percent_decode_str(raw_key).decode_utf8_lossy();

            if key == LEGACY_UNIQUE_ID_KEY {
                let raw_value = raw_value.replace('+', " ");
                unique_id = percent_decode_str(&raw_value)
                    .decode_utf8_lossy()
                    .into_owned();
                continue;
            }

            let value = percent_decode_str(raw_value).decode_utf8_lossy();

            let Some(name) = key.strip_suffix(LEGACY_EVENT_SUFFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let event = match &*value {
                "" => TrackedEvent::builder()
                    .name(name)
                    .timestamp(received_at)
                    .build(),
                value => TrackedEvent::builder()
                    .name(name)
                    .value(value)
                    .timestamp(received_at)
                    .build(),
            };
            events.push(event);
        }

        Self { unique_id, events }
    }
}
