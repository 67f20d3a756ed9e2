use crate::event_log::EventLog;
use std::sync::Arc;

#[derive(Clone)]
pub struct CollectorState {
    event_log: Arc<EventLog>,
}

impl CollectorState {
    pub fn new(event_log: EventLog) -> Self {
        Self {
            event_log: Arc::new(event_log),
        }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }
}
