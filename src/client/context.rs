use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::YaloError;

#[derive(Debug, Clone, Default)]
/// Cancellation and deadline for one client call.
///
/// Firing either aborts the wait for a rate-limit ticket, the in-flight HTTP request
/// and any backoff sleep.
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled together with `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Drive `fut` to completion unless the context fires first.
    pub(crate) async fn run<T, F>(&self, fut: F) -> Result<T, YaloError>
    where
        F: Future<Output = Result<T, YaloError>>,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(YaloError::Cancelled),
            _ = deadline => Err(YaloError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
