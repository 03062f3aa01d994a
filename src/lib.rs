//! Start, wait for and stop a long-running service under cancellable
//! contexts, folding every failure into a single [`LifecycleError`].

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod heartbeat;
pub mod lifecycle;

pub use app::signals::forward_interrupts;
pub use app::{run_lifecycle, Orchestrator, RunState, ShutdownReason};
pub use config::{HeartbeatConfig, HostConfig, LogConfig, LogFormat};
pub use context::{Context, ContextState};
pub use error::{BoxError, Cause, LifecycleError, Phase, Result};
pub use heartbeat::{HeartbeatError, HeartbeatService};
pub use lifecycle::Lifecycle;
