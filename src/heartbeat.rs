use crate::app::ShutdownReason;
use crate::config::HeartbeatConfig;
use crate::context::Context;
use crate::error::BoxError;
use crate::lifecycle::Lifecycle;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum HeartbeatError {
    #[error("heartbeat service already started")]
    AlreadyStarted,

    #[error("start abandoned, context already cancelled")]
    Aborted,

    #[error("heartbeat task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Demo service that logs a heartbeat at a fixed interval.
///
/// With `max_beats` set it asks for its own shutdown by cancelling the run
/// context once the limit is reached.
pub struct HeartbeatService {
    config: HeartbeatConfig,
    ticker: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    beats: Arc<AtomicU64>,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl HeartbeatService {
    pub fn new(config: HeartbeatConfig) -> Self {
        Self {
            config,
            ticker: CancellationToken::new(),
            task: Mutex::new(None),
            beats: Arc::new(AtomicU64::new(0)),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Heartbeats emitted so far
    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Lifecycle for HeartbeatService {
    async fn start(&self, ctx: Context) -> Result<(), BoxError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(HeartbeatError::AlreadyStarted.into());
        }
        if ctx.is_done() {
            return Err(HeartbeatError::Aborted.into());
        }

        info!("Starting heartbeat every {}ms", self.config.interval_ms);

        let period = Duration::from_millis(self.config.interval_ms);
        let max_beats = self.config.max_beats;
        let ticker = self.ticker.clone();
        let beats = Arc::clone(&self.beats);

        let handle = tokio::spawn(async move {
            let first_beat = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(first_beat, period);

            loop {
                tokio::select! {
                    _ = ticker.cancelled() => {
                        debug!("Heartbeat ticker stopping");
                        break;
                    }
                    _ = interval.tick() => {
                        let count = beats.fetch_add(1, Ordering::SeqCst) + 1;
                        info!("Heartbeat {}", count);

                        if max_beats > 0 && count >= max_beats {
                            info!("Reached {} heartbeats - requesting shutdown", count);
                            ctx.cancel_with_cause(ShutdownReason::Requested(format!(
                                "reached {} heartbeats",
                                count
                            )));
                            break;
                        }
                    }
                }
            }
        });

        *self.task.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self, ctx: Context) -> Result<(), BoxError> {
        info!("Stopping heartbeat service");
        self.ticker.cancel();

        let task = self.task.lock().take();
        let joined = match task {
            Some(handle) => handle.await.map_err(HeartbeatError::from),
            None => Ok(()),
        };

        // Idle before exiting unless asked to hurry
        if self.config.stop_grace_ms > 0 {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(self.config.stop_grace_ms)) => {
                    debug!("Stop grace period elapsed");
                }
                _ = ctx.done() => match ctx.cause() {
                    Some(cause) => info!("Shutdown hurried: {}", cause),
                    None => info!("Shutdown hurried"),
                },
            }
        }

        self.stopped.store(true, Ordering::SeqCst);
        info!("Heartbeat service stopped after {} beats", self.beats());

        joined.map_err(Into::into)
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
