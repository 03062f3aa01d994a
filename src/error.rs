use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Error type returned by services and factories.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Reason recorded on a context when it was cancelled.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// The orchestration phase an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Start,
    Stop,
}

/// Aggregated result of a failed orchestration run.
///
/// Each variant joins the phase-local error with the cause recorded on the
/// context that governed that phase. Both stay reachable as values, so
/// callers can match on them with [`LifecycleError::find`] instead of
/// parsing the message.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("failed to setup: {source}{}", joined(.cause))]
    Setup { source: BoxError, cause: Option<Cause> },

    #[error("failed to start: {source}{}", joined(.cause))]
    Start { source: BoxError, cause: Option<Cause> },

    #[error("failed to stop: {source}{}", joined(.cause))]
    Stop { source: BoxError, cause: Option<Cause> },
}

impl LifecycleError {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Setup { .. } => Phase::Setup,
            Self::Start { .. } => Phase::Start,
            Self::Stop { .. } => Phase::Stop,
        }
    }

    /// The error returned by the factory, `start` or `stop`
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::Setup { source, .. } | Self::Start { source, .. } | Self::Stop { source, .. } => {
                &**source
            }
        }
    }

    /// The context cause joined to the phase error, if one was recorded
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Self::Setup { cause, .. } | Self::Start { cause, .. } | Self::Stop { cause, .. } => {
                cause.as_ref()
            }
        }
    }

    /// Find the first error of type `E` in the phase error chain, then in
    /// the cause chain.
    pub fn find<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        let inner: &(dyn StdError + 'static) = self.inner();
        find_in::<E>(Some(inner)).or_else(|| {
            self.cause()
                .and_then(|cause| find_in::<E>(Some(&**cause as &(dyn StdError + 'static))))
        })
    }

    /// Whether an error of type `E` is part of this error
    pub fn contains<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.find::<E>().is_some()
    }
}

fn find_in<'a, E>(mut current: Option<&'a (dyn StdError + 'static)>) -> Option<&'a E>
where
    E: StdError + 'static,
{
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<E>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

// Absent causes are dropped from the joined message
fn joined(cause: &Option<Cause>) -> String {
    match cause {
        Some(cause) => format!("\n{}", cause),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("disk unavailable")]
    struct DiskError;

    #[derive(Error, Debug)]
    #[error("mount failed")]
    struct MountError {
        #[source]
        source: DiskError,
    }

    #[derive(Error, Debug)]
    #[error("operator asked to quit")]
    struct QuitRequested;

    #[test]
    fn test_display_without_cause() {
        let err = LifecycleError::Start {
            source: Box::new(DiskError),
            cause: None,
        };

        assert_eq!(err.to_string(), "failed to start: disk unavailable");
        assert_eq!(err.phase(), Phase::Start);
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_display_joins_cause() {
        let err = LifecycleError::Stop {
            source: Box::new(DiskError),
            cause: Some(Arc::new(QuitRequested)),
        };

        assert_eq!(
            err.to_string(),
            "failed to stop: disk unavailable\noperator asked to quit"
        );
    }

    #[test]
    fn test_find_walks_source_chain() {
        let err = LifecycleError::Setup {
            source: Box::new(MountError { source: DiskError }),
            cause: None,
        };

        assert!(err.find::<MountError>().is_some());
        assert!(err.find::<DiskError>().is_some());
        assert!(!err.contains::<QuitRequested>());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_find_reaches_cause() {
        let err = LifecycleError::Setup {
            source: Box::new(DiskError),
            cause: Some(Arc::new(QuitRequested)),
        };

        assert!(err.contains::<DiskError>());
        assert!(err.contains::<QuitRequested>());
    }
}
