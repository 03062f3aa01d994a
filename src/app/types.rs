use thiserror::Error;

/// Where an orchestration run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SettingUp,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

/// Reason a context was cancelled.
///
/// Recorded as the context cause, so a requested shutdown and an
/// interrupt-driven one stay distinguishable after the fact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    #[error("interrupted by {0}")]
    Signal(String),

    #[error("forced shutdown by {0}")]
    Forced(String),

    #[error("shutdown requested: {0}")]
    Requested(String),
}

impl ShutdownReason {
    /// Whether the service itself asked to stop
    pub fn is_requested(&self) -> bool {
        matches!(self, Self::Requested(_))
    }
}
