use std::sync::Arc;
use std::time::Duration;

use scanner_logging::scanner_debug;
use tokio::sync::Mutex;

pub const DEFAULT_PACING: Duration = Duration::from_millis(200);
pub const DEFAULT_PACING_REASON: &str = "politeness delay before each upstream page";

/// Fixed delay observed before every upstream page request.
///
/// Clones made with [`Pacing::shared`] serialize their waits through one gate,
/// so concurrent scans in the same process never start requests closer together
/// than the interval.
#[derive(Debug, Clone)]
pub struct Pacing {
    interval: Duration,
    reason: &'static str,
    gate: Option<Arc<Mutex<()>>>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::per_scan(DEFAULT_PACING)
    }
}

impl Pacing {
    pub fn per_scan(interval: Duration) -> Self {
        Self {
            interval,
            reason: DEFAULT_PACING_REASON,
            gate: None,
        }
    }

    pub fn shared(interval: Duration) -> Self {
        Self {
            interval,
            reason: DEFAULT_PACING_REASON,
            gate: Some(Arc::new(Mutex::new(()))),
        }
    }

    pub fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = reason;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }

    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        scanner_debug!("Waiting {:?}: {}", self.interval, self.reason);
        match &self.gate {
            Some(gate) => {
                let _turn = gate.lock().await;
                tokio::time::sleep(self.interval).await;
            }
            None => tokio::time::sleep(self.interval).await,
        }
    }
}
