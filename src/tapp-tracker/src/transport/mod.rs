//! Delivery of report payloads to the collection endpoint.
//!
//! The tracker only needs "POST this payload to that URL"; [`Transport`] is that seam and
//! [`HttpTransport`] is the reqwest-backed implementation used outside of tests.

mod error;
mod http;
#[cfg(test)]
pub(crate) mod testing;

pub use error::DeliveryError;
pub use http::HttpTransport;

use std::future::Future;
use tapp_common::ReportPayload;
use url::Url;

pub trait Transport: Send + Sync + 'static {
    /// Makes exactly one delivery attempt.
    fn deliver(
        &self,
        url: &Url,
        payload: &ReportPayload,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
