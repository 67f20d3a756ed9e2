use crate::error::CollectorError;
use crate::state::CollectorState;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use tapp_common::ReportPayload;
use tracing::{debug, info};

pub const ROOT_ENDPOINT: &str = "/";
pub const EVENTS_ENDPOINT: &str = "/events";

const FORWARDED_FOR: &str = "x-forwarded-for";

pub async fn receive_events(
    State(state): State<CollectorState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CollectorError> {
    if body.is_empty() {
        debug!("Empty report from {}", peer);
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let received_at = Utc::now();
    let payload = decode_payload(&headers, &body, received_at)?;
    let remote_addr = remote_addr(&headers, peer);

    let accepted = state
        .event_log()
        .append(&payload, &remote_addr, received_at)
        .await?;

    info!(
        "Accepted {} events from {} ({})",
        accepted,
        remote_addr,
        payload.unique_id_or_unknown()
    );

    Ok(Json(json!({ "accepted": accepted })).into_response())
}

/// JSON when the request says so, the legacy form encoding otherwise.
fn decode_payload(
    headers: &HeaderMap,
    body: &[u8],
    received_at: DateTime<Utc>,
) -> Result<ReportPayload, CollectorError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));

    if is_json {
        Ok(ReportPayload::from_json(body)?)
    } else {
        Ok(ReportPayload::from_legacy_form(
            &String::from_utf8_lossy(body),
            received_at,
        ))
    }
}

/// First hop of a non-empty `X-Forwarded-For`, else the peer address.
fn remote_addr(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}
