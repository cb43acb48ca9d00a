//! Fixed pacing between consecutive requests.
//!
//! Guarantees at least `min_interval` between the starts of two requests.
//! The first request goes out immediately.

use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Wait until the next request may be sent, then record it
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Pacing: waiting before next request"
                );
                sleep(wait_time).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
