use crate::transport::DeliveryError;
use std::fmt;

/// What a flush did. Only the host that triggered the flush sees this; `track_event` callers
/// never do.
#[derive(Debug)]
pub enum FlushOutcome {
    /// Nothing was pending, no request was made
    Empty,
    Delivered {
        count: usize,
    },
    /// The batch was discarded after a failed (or impossible) delivery
    Dropped {
        count: usize,
        error: DeliveryError,
    },
    /// A timer tick found another flush in flight
    Skipped,
    /// Shutdown reporting is turned off
    Disabled,
    /// The shutdown deadline passed before the flush finished
    TimedOut,
}

impl FlushOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, FlushOutcome::Delivered { .. })
    }

    pub fn delivered_count(&self) -> usize {
        match self {
            FlushOutcome::Delivered { count } => *count,
            _ => 0,
        }
    }
}

impl fmt::Display for FlushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushOutcome::Empty => write!(f, "no pending events"),
            FlushOutcome::Delivered { count } => write!(f, "delivered {} events", count),
            FlushOutcome::Dropped { count, error } => {
                write!(f, "dropped {} events: {}", count, error)
            }
            FlushOutcome::Skipped => write!(f, "skipped, another flush is in flight"),
            FlushOutcome::Disabled => write!(f, "shutdown reporting is disabled"),
            FlushOutcome::TimedOut => write!(f, "timed out before delivery finished"),
        }
    }
}
