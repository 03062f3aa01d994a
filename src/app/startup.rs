use super::orchestrator::release;
use super::{Orchestrator, RunState};
use crate::context::Context;
use crate::error::{BoxError, LifecycleError, Result};
use crate::lifecycle::Lifecycle;
use std::future::Future;
use tracing::{error, info};

impl Orchestrator {
    /// Construct the service bound to the run context
    pub(super) async fn setup<F, Fut, L>(&self, factory: F, run_ctx: &Context) -> Result<L>
    where
        F: FnOnce(Context) -> Fut,
        Fut: Future<Output = std::result::Result<L, BoxError>>,
        L: Lifecycle,
    {
        info!("Setting up {}", self.name);
        self.set_state(RunState::SettingUp);

        match factory(run_ctx.clone()).await {
            Ok(service) => Ok(service),
            Err(source) => {
                let cause = release(run_ctx);
                self.set_state(RunState::Failed);
                error!("Failed to set up {}: {}", self.name, source);
                Err(LifecycleError::Setup { source, cause })
            }
        }
    }

    pub(super) async fn start_service<L>(&self, service: &L, run_ctx: &Context) -> Result<()>
    where
        L: Lifecycle,
    {
        info!("Starting {}", self.name);
        self.set_state(RunState::Starting);

        if let Err(source) = service.start(run_ctx.clone()).await {
            let cause = release(run_ctx);
            self.set_state(RunState::Failed);
            error!("Failed to start {}: {}", self.name, source);
            return Err(LifecycleError::Start { source, cause });
        }

        info!("{} started successfully", self.name);
        Ok(())
    }
}
