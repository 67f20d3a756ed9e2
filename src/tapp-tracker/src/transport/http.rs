use crate::constants::USER_AGENT;
use crate::transport::{DeliveryError, Transport};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::{Duration, Instant};
use tapp_common::ReportPayload;
use tracing::debug;
use url::Url;

/// Posts JSON payloads with reqwest
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn try_new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

impl Transport for HttpTransport {
    async fn deliver(&self, url: &Url, payload: &ReportPayload) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(payload)?;
        let start_time = Instant::now();

        debug!(
            "Posting {} events ({} bytes) to {}",
            payload.len(),
            body.len(),
            url
        );

        let response = self
            .client
            .post(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!("Collector answered {} in {:?}", status, start_time.elapsed());

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DeliveryError::server_error(status.as_u16(), body))
        }
    }
}
