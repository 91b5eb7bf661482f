use async_trait::async_trait;
use std::time::Duration;

/// Waits between two combinations of a sweep.
#[async_trait]
pub trait Pacer: std::fmt::Debug + Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Real-time pacing on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_the_requested_delay() {
        let start = tokio::time::Instant::now();
        TokioPacer.pause(Duration::from_secs(1)).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
