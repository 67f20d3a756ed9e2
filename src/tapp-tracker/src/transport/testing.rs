use crate::transport::{DeliveryError, Transport};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tapp_common::ReportPayload;
use url::Url;

/// In-memory transport that records every delivery attempt
#[derive(Default)]
pub(crate) struct RecordingTransport {
    deliveries: Mutex<Vec<(Url, ReportPayload)>>,
    attempts: AtomicUsize,
    delay: Option<Duration>,
    fail_with_status: Option<u16>,
}

impl RecordingTransport {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_failure(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn deliveries(&self) -> Vec<(Url, ReportPayload)> {
        self.deliveries.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Transport for RecordingTransport {
    async fn deliver(&self, url: &Url, payload: &ReportPayload) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.deliveries.lock().push((url.clone(), payload.clone()));

        match self.fail_with_status {
            Some(status) => Err(DeliveryError::server_error(
                status,
                "simulated failure".to_string(),
            )),
            None => Ok(()),
        }
    }
}
