use super::RunState;
use crate::context::Context;
use crate::error::{BoxError, Cause, Result};
use crate::lifecycle::Lifecycle;
use parking_lot::Mutex;
use std::future::Future;
use tracing::{info, info_span, Instrument};

/// Drives a single service through setup, start, wait and stop.
///
/// The host context is the root of every context the orchestrator hands
/// out. Cancelling it ends the run phase and, if it happens during
/// shutdown, asks the service to stop faster.
pub struct Orchestrator {
    pub(super) host: Context,
    pub(super) name: String,
    pub(super) state: Mutex<RunState>,
}

impl Orchestrator {
    pub fn new(host: Context) -> Self {
        Self {
            host,
            name: "service".to_string(),
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Name used in log output
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a service with `factory`, run it until the run context is
    /// cancelled, then stop it.
    ///
    /// The factory receives the run context. A service that wants to shut
    /// itself down cancels that context, ideally with a cause.
    ///
    /// If `start` fails the service is *not* stopped here. Callers that
    /// need cleanup after a failed start should return an `Arc` from the
    /// factory, keep a clone, and call `stop` on it when they see
    /// [`LifecycleError::Start`](crate::LifecycleError::Start).
    pub async fn run<F, Fut, L>(&self, factory: F) -> Result<()>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future<Output = std::result::Result<L, BoxError>>,
        L: Lifecycle,
    {
        let span = info_span!("lifecycle", service = %self.name);
        self.drive(factory).instrument(span).await
    }

    async fn drive<F, Fut, L>(&self, factory: F) -> Result<()>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future<Output = std::result::Result<L, BoxError>>,
        L: Lifecycle,
    {
        let run_ctx = self.host.child();

        let service = self.setup(factory, &run_ctx).await?;
        self.start_service(&service, &run_ctx).await?;

        self.set_state(RunState::Running);
        info!("{} is running", self.name);

        // Ended by the host (interrupt) or by the service requesting shutdown
        run_ctx.done().await;
        match run_ctx.cause() {
            Some(cause) => info!("Shutdown initiated: {}", cause),
            None => info!("Shutdown initiated"),
        }

        // Derived from the host, the run context is already cancelled
        let stop_ctx = self.host.child();
        self.shutdown(&service, stop_ctx).await
    }
}

/// Run `factory`'s service under a child of `host`.
pub async fn run_lifecycle<F, Fut, L>(host: &Context, factory: F) -> Result<()>
where
    F: FnOnce(Context) -> Fut,
    Fut: Future<Output = std::result::Result<L, BoxError>>,
    L: Lifecycle,
{
    Orchestrator::new(host.clone()).run(factory).await
}

/// Capture the cause of `ctx`, then cancel it to release its waiters.
///
/// The release cancellation carries no cause and is never reported.
pub(super) fn release(ctx: &Context) -> Option<Cause> {
    let cause = ctx.cause();
    ctx.cancel();
    cause
}
