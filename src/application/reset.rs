//! Periodic rate limiter reset.
//!
//! Rate limiting windows are global: a background task clears every counter
//! at a fixed interval. The task is explicitly cancellable so tests and
//! graceful shutdown can stop it deterministically.
//!
//! Two drivers are available:
//! - [`ResetTask::start`] runs on a dedicated thread (no runtime required)
//! - [`ResetTask::start_async`] runs on a tokio interval (`async` feature)

use crate::application::config::ResetConfig;
use crate::application::limiter::RateLimiter;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(feature = "async")]
use tokio::sync::oneshot;

/// Error returned when a reset task does not stop cleanly.
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    /// The reset thread panicked
    #[error("rate limiter reset thread panicked")]
    ThreadPanicked,
    /// The async reset task panicked or was aborted
    #[cfg(feature = "async")]
    #[error("rate limiter reset task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Clears a limiter's counters at a fixed interval.
#[derive(Debug, Clone)]
pub struct ResetTask {
    limiter: Arc<RateLimiter>,
    config: ResetConfig,
}

impl ResetTask {
    /// Create a reset task for `limiter`.
    pub fn new(limiter: Arc<RateLimiter>, config: ResetConfig) -> Self {
        Self { limiter, config }
    }

    /// Get the reset configuration.
    pub fn config(&self) -> &ResetConfig {
        &self.config
    }

    /// Start resetting on a dedicated thread.
    ///
    /// The thread runs until [`ResetHandle::shutdown`] is called or the
    /// handle is dropped.
    pub fn start(self) -> ResetHandle {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.config.interval;
        let limiter = self.limiter;

        let thread = thread::Builder::new()
            .name("ratelog-reset".to_string())
            .spawn(move || {
                tracing::debug!(?interval, "rate limiter reset thread started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => limiter.reset(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("rate limiter reset thread stopped");
            });

        match thread {
            Ok(thread) => ResetHandle {
                stop: Some(stop_tx),
                thread: Some(thread),
            },
            Err(err) => {
                // Without a reset thread counters only clear on manual resets
                tracing::warn!(error = %err, "cannot spawn rate limiter reset thread");
                ResetHandle {
                    stop: None,
                    thread: None,
                }
            }
        }
    }

    /// Start resetting on the current tokio runtime.
    ///
    /// Must be called from within a tokio runtime.
    #[cfg(feature = "async")]
    pub fn start_async(self) -> AsyncResetHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = self.config.interval;
        let limiter = self.limiter;

        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.reset(),
                    _ = &mut shutdown_rx => break,
                }
            }
            tracing::debug!("rate limiter reset task stopped");
        });

        AsyncResetHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running reset thread.
///
/// Dropping the handle stops the thread.
#[derive(Debug)]
pub struct ResetHandle {
    stop: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ResetHandle {
    /// Returns true while the reset thread is alive.
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .map(|thread| !thread.is_finished())
            .unwrap_or(false)
    }

    /// Stop the reset thread and wait for it to exit.
    ///
    /// # Errors
    /// Returns `ShutdownError::ThreadPanicked` if the thread panicked.
    pub fn shutdown(mut self) -> Result<(), ShutdownError> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Result<(), ShutdownError> {
        if let Some(stop) = self.stop.take() {
            // The receiver is gone only if the thread already exited
            let _ = stop.send(());
        }
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ShutdownError::ThreadPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for ResetHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop_and_join() {
            tracing::debug!(error = %err, "reset thread ended abnormally");
        }
    }
}

/// Handle to a running async reset task.
///
/// Dropping the handle without calling [`AsyncResetHandle::shutdown`] closes
/// the shutdown channel, which also stops the task.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncResetHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

#[cfg(feature = "async")]
impl AsyncResetHandle {
    /// Returns true while the task is alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the task and wait for it to exit.
    ///
    /// # Errors
    /// Returns `ShutdownError::Join` if the task panicked or was aborted.
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        (&mut self.task).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn saturated_limiter() -> Arc<RateLimiter> {
        let limiter = Arc::new(RateLimiter::new());
        limiter.should_suppress(1, "src/a.rs:1");
        limiter.should_suppress(1, "src/a.rs:1");
        assert!(limiter.should_suppress(1, "src/a.rs:1").is_suppressed());
        limiter
    }

    #[test]
    fn test_thread_resets_counters() {
        let limiter = saturated_limiter();
        let config = ResetConfig::new(Duration::from_millis(20)).unwrap();
        let handle = ResetTask::new(Arc::clone(&limiter), config).start();

        assert!(handle.is_running());
        std::thread::sleep(Duration::from_millis(100));

        assert!(limiter.is_empty());
        handle.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_stops_resets() {
        let limiter = Arc::new(RateLimiter::new());
        let config = ResetConfig::new(Duration::from_millis(20)).unwrap();
        let handle = ResetTask::new(Arc::clone(&limiter), config).start();

        handle.shutdown().unwrap();

        limiter.should_suppress(1, "src/a.rs:1");
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(limiter.count_for("src/a.rs:1"), Some(1));
    }

    #[test]
    fn test_drop_stops_thread() {
        let limiter = Arc::new(RateLimiter::new());
        let config = ResetConfig::new(Duration::from_secs(60)).unwrap();
        let handle = ResetTask::new(limiter, config).start();

        // Returns promptly even with a long interval
        drop(handle);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_resets_and_shuts_down() {
        let limiter = saturated_limiter();
        let config = ResetConfig::new(Duration::from_millis(20)).unwrap();
        let handle = ResetTask::new(Arc::clone(&limiter), config).start_async();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(limiter.is_empty());

        handle.shutdown().await.expect("shutdown failed");

        limiter.should_suppress(1, "src/a.rs:1");
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(limiter.count_for("src/a.rs:1"), Some(1));
    }
}
