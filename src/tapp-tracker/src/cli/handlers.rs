use crate::config::TrackerConfig;
use crate::transport::Transport;
use crate::{EventTracker, FlushOutcome};
use anyhow::{bail, Context, Result};
use std::future::Future;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

pub(super) fn info(config: &TrackerConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let report_url = config
        .report_url
        .as_ref()
        .map(|url| url.to_string())
        .unwrap_or_else(|| "<not configured, delivery disabled>".to_string());
    let report_interval = match config.report_period() {
        Some(period) => format!("{:?}", period),
        None => "disabled".to_string(),
    };

    println!("Unique id:          {}", config.unique_id);
    println!("Report URL:         {}", report_url);
    println!("Report interval:    {}", report_interval);
    println!("Report at shutdown: {}", config.report_at_shutdown);
    println!("Verbose:            {}", config.be_verbose);
    println!("Request timeout:    {:?}", config.request_timeout());
    println!("Shutdown deadline:  {:?}", config.shutdown_deadline());
    Ok(())
}

pub(super) async fn track<T: Transport>(
    tracker: EventTracker<T>,
    name: String,
    value: Option<String>,
) -> Result<()> {
    if name.is_empty() {
        bail!("event name must not be empty");
    }

    match value {
        Some(value) => tracker.track_event_with_value(name, value),
        None => tracker.track_event(name),
    }

    report(tracker.flush().await)
}

pub(super) async fn pipe<T: Transport>(tracker: EventTracker<T>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let recorded = record_lines(&tracker, stdin, interrupted(tokio::signal::ctrl_c())).await?;
    info!("Read {} events from stdin", recorded);

    report(tracker.shutdown().await)
}

/// Resolves once `signal` fires. A listener that failed to install never resolves, leaving EOF
/// as the only way out.
async fn interrupted(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Interrupted, reporting pending events"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, reading until EOF: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Records one event per non-blank line until EOF or `stop` resolves.
async fn record_lines<T, R>(
    tracker: &EventTracker<T>,
    reader: R,
    stop: impl Future<Output = ()>,
) -> Result<usize>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut recorded = 0;
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Some((name, Some(value))) => tracker.track_event_with_value(name, value),
                    Some((name, None)) => tracker.track_event(name),
                    None => continue,
                }
                recorded += 1;
            }
        }
    }

    Ok(recorded)
}

/// `name` or `name,value`; blank lines and lines with an empty name yield `None`.
fn parse_line(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim();
    let (name, value) = match line.split_once(',') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (line, None),
    };

    if name.is_empty() {
        None
    } else {
        Some((name, value))
    }
}

fn report(outcome: FlushOutcome) -> Result<()> {
    match outcome {
        FlushOutcome::Dropped { .. } | FlushOutcome::TimedOut => bail!("{}", outcome),
        outcome => {
            println!("{}", outcome);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::RecordingTransport;
    use rstest::rstest;
    use url::Url;

    #[rstest]
    #[case("app_open", Some(("app_open", None)))]
    #[case("purchase,9.99", Some(("purchase", Some("9.99"))))]
    #[case("  purchase , 9.99 ", Some(("purchase", Some("9.99"))))]
    #[case("note,a,b", Some(("note", Some("a,b"))))]
    #[case("", None)]
    #[case("   ", None)]
    #[case(",orphan", None)]
    fn test_parse_line(#[case] line: &str, #[case] expected: Option<(&str, Option<&str>)>) {
        assert_eq!(parse_line(line), expected);
    }

    #[tokio::test]
    async fn test_record_lines_until_eof() {
        let tracker = EventTracker::new(
            TrackerConfig {
                report_url: Some(Url::parse("https://collector.test/events").unwrap()),
                report_interval: 0.0,
                ..TrackerConfig::default()
            },
            RecordingTransport::default(),
        );
        let input: &[u8] = b"app_open\n\npurchase,9.99\n";

        let recorded = record_lines(&tracker, input, std::future::pending())
            .await
            .unwrap();

        assert_eq!(recorded, 2);
        assert_eq!(tracker.pending_len(), 2);
    }

    #[tokio::test]
    async fn test_failed_signal_listener_reads_until_eof() {
        let tracker = EventTracker::new(
            TrackerConfig {
                report_interval: 0.0,
                ..TrackerConfig::default()
            },
            RecordingTransport::default(),
        );
        let input: &[u8] = b"app_open\npurchase,9.99\napp_close\n";
        let signal = async { Err::<(), _>(io::Error::other("signal handler unavailable")) };

        let recorded = record_lines(&tracker, input, interrupted(signal))
            .await
            .unwrap();

        assert_eq!(recorded, 3);
        assert_eq!(tracker.pending_len(), 3);
    }

    #[tokio::test]
    async fn test_signal_stops_reading() {
        let tracker = EventTracker::new(
            TrackerConfig {
                report_interval: 0.0,
                ..TrackerConfig::default()
            },
            RecordingTransport::default(),
        );
        let (_writer, reader) = tokio::io::duplex(64);

        let recorded = record_lines(
            &tracker,
            BufReader::new(reader),
            interrupted(async { Ok::<(), io::Error>(()) }),
        )
        .await
        .unwrap();

        assert_eq!(recorded, 0);
    }

    #[test]
    fn test_report_fails_on_dropped_batch() {
        let outcome = FlushOutcome::Dropped {
            count: 3,
            error: crate::transport::DeliveryError::MissingUrl,
        };
        assert!(report(outcome).is_err());
        assert!(report(FlushOutcome::Empty).is_ok());
    }
}
