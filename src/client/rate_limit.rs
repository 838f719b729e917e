use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};

/// Yalo accepts at most 40 requests per second per account.
pub const DEFAULT_RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(25);

/// Ticking gate shared by every clone of a client: admits one request per `period`.
///
/// Waiters are not admitted in call order; only the aggregate rate is bounded.
#[derive(Debug)]
pub(crate) struct RateGate {
    period: Duration,
    // Created on first use so that building a client does not require a runtime.
    ticker: Mutex<Option<Interval>>,
}

impl RateGate {
    /// `period` must be non-zero.
    pub(crate) fn new(period: Duration) -> Self {
        Self {
            period,
            ticker: Mutex::new(None),
        }
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next admission ticket. Cancel-safe.
    pub(crate) async fn acquire(&self) {
        let mut ticker = self.ticker.lock().await;
        let ticker = ticker.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(self.period);
            // After an idle stretch the next ticket is immediate, but tickets are never
            // closer together than `period`.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        ticker.tick().await;
    }
}
