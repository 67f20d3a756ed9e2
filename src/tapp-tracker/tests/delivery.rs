use std::net::SocketAddr;
use std::time::Duration;
use tapp_collector::{CollectorConfig, CollectorServer};
use tapp_tracker::config::TrackerConfig;
use tapp_tracker::transport::{DeliveryError, HttpTransport};
use tapp_tracker::{EventTracker, FlushOutcome};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn start_collector(log_dir: &TempDir) -> (SocketAddr, CancellationToken) {
    let config = CollectorConfig {
        listen: "127.0.0.1:0".to_string(),
        log_dir: log_dir.path().to_path_buf(),
        file_prefix: "tapp_events_".to_string(),
    };
    let server = CollectorServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let shutdown = CancellationToken::new();
    tokio::spawn(server.run(shutdown.clone()));
    (addr, shutdown)
}

fn tracker_for(url: &str) -> EventTracker {
    let config = TrackerConfig {
        unique_id: "device-42".to_string(),
        report_interval: 0.0,
        ..TrackerConfig::default()
    };
    let transport = HttpTransport::try_new(Duration::from_secs(2)).unwrap();
    let tracker = EventTracker::new(config, transport);
    tracker.set_report_url(url);
    tracker
}

fn read_log_lines(log_dir: &TempDir) -> Vec<String> {
    let files: Vec<_> = std::fs::read_dir(log_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    std::fs::read_to_string(&files[0])
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_batch_reaches_collector_in_order() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_collector(&log_dir).await;
    let tracker = tracker_for(&format!("http://{}/events", addr));

    tracker.track_event("app_open");
    tracker.track_event_with_value("purchase", "9.99");

    let outcome = tracker.flush().await;
    assert!(matches!(outcome, FlushOutcome::Delivered { count: 2 }));
    assert_eq!(tracker.pending_len(), 0);

    let lines = read_log_lines(&log_dir);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(",127.0.0.1,device-42,app_open,"));
    assert!(lines[1].ends_with(",127.0.0.1,device-42,purchase,9.99"));

    assert!(matches!(tracker.flush().await, FlushOutcome::Empty));
    shutdown.cancel();
}

#[tokio::test]
async fn test_shutdown_flush_delivers_pending_events() {
    let log_dir = tempfile::tempdir().unwrap();
    let (addr, shutdown) = start_collector(&log_dir).await;
    let tracker = tracker_for(&format!("http://{}/", addr));

    tracker.track_event("app_close");

    let outcome = tracker.flush_and_wait(Duration::from_secs(5)).await;
    assert!(matches!(outcome, FlushOutcome::Delivered { count: 1 }));
    assert!(read_log_lines(&log_dir)[0].ends_with(",device-42,app_close,"));
    shutdown.cancel();
}

#[tokio::test]
async fn test_unreachable_collector_drops_batch() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let tracker = tracker_for(&format!("http://{}/events", addr));

    tracker.track_event("app_open");

    let outcome = tracker.flush().await;
    assert!(matches!(
        outcome,
        FlushOutcome::Dropped {
            count: 1,
            error: DeliveryError::Network(_)
        }
    ));
    assert_eq!(tracker.pending_len(), 0);
}
