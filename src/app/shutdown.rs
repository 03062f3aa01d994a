use super::orchestrator::release;
use super::{Orchestrator, RunState};
use crate::context::Context;
use crate::error::{LifecycleError, Result};
use crate::lifecycle::Lifecycle;
use tracing::{debug, error, info, warn};

impl Orchestrator {
    /// Stop the service under the stop context.
    ///
    /// The stop context is cancelled once `stop` returns. Its cause is read
    /// before that, so a failure reports why the host hurried the shutdown
    /// and never the release cancellation itself.
    pub(super) async fn shutdown<L>(&self, service: &L, stop_ctx: Context) -> Result<()>
    where
        L: Lifecycle,
    {
        info!("Stopping {}", self.name);
        self.set_state(RunState::Stopping);

        let result = service.stop(stop_ctx.clone()).await;
        let cause = release(&stop_ctx);

        match result {
            Ok(()) => {
                if let Some(cause) = cause {
                    debug!("{} stopped after shutdown was hurried: {}", self.name, cause);
                }
                if !service.is_stopped() {
                    warn!("{} returned from stop but does not report stopped", self.name);
                }
                self.set_state(RunState::Stopped);
                info!("{} stopped", self.name);
                Ok(())
            }
            Err(source) => {
                self.set_state(RunState::Failed);
                error!("Failed to stop {}: {}", self.name, source);
                Err(LifecycleError::Stop { source, cause })
            }
        }
    }
}
