use std::time::Duration;

use async_trait::async_trait;

/// Wait primitive used between retry attempts.
///
/// Implementations must suspend for at least the requested duration and must
/// not spin.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Timer-backed delay on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<D> Delay for &D
where
    D: Delay + ?Sized,
{
    async fn wait(&self, duration: Duration) {
        (**self).wait(duration).await;
    }
}
