use crate::config::CollectorConfig;
use crate::event_log::EventLog;
use crate::routes::ROUTES;
use crate::state::CollectorState;
use anyhow::{Context, Result};
use axum::Router;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub fn get_router(state: CollectorState) -> Router {
    let mut router = Router::new();
    for (path, method_router) in ROUTES.iter() {
        router = router.route(path, method_router.clone());
    }
    router.with_state(state)
}

async fn create_listener(listen: &str) -> Result<TcpListener> {
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address {:?}", listen))?;

    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            Err(e).with_context(|| format!("port {} is already in use", addr.port()))
        }
        Err(e) => Err(e).with_context(|| format!("failed to bind to address {}", addr)),
    }
}

pub struct CollectorServer {
    listener: TcpListener,
    router: Router,
}

impl CollectorServer {
    pub async fn bind(config: &CollectorConfig) -> Result<Self> {
        let listener = create_listener(&config.listen).await?;
        let event_log = EventLog::new(&config.log_dir, &config.file_prefix);

        Ok(Self {
            listener,
            router: get_router(CollectorState::new(event_log)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read listener address")
    }

    /// Serves until `shutdown` is cancelled, then lets in-flight requests finish.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!("Collector listening on {}", self.local_addr()?);

        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("collector server failed")?;

        info!("Collector stopped");
        Ok(())
    }
}
