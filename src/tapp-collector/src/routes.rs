use crate::handlers::{receive_events, EVENTS_ENDPOINT, ROOT_ENDPOINT};
use crate::state::CollectorState;
use axum::routing::{post, MethodRouter};
use std::sync::LazyLock;

pub(crate) static ROUTES: LazyLock<Vec<(&'static str, MethodRouter<CollectorState>)>> =
    LazyLock::new(|| {
        vec![
            (ROOT_ENDPOINT, post(receive_events)),
            (EVENTS_ENDPOINT, post(receive_events)),
        ]
    });
