use std::future::Future;
use std::time::Duration;

/// Suspends the current task for a fixed duration
///
/// Both the rate-limit backoff and the per-step pause go through this,
/// so tests can record the requested delays instead of waiting them out.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real wall-clock sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

impl<S: Sleeper> Sleeper for &S {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        (**self).sleep(duration)
    }
}
