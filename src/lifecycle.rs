//! Contract for services driven by the orchestrator.

use crate::context::Context;
use crate::error::BoxError;
use async_trait::async_trait;
use std::sync::Arc;

/// A stoppable service.
#[async_trait]
pub trait Lifecycle
where
    Self: Send + Sync,
{
    /// Start the service.
    ///
    /// A service only fully starts once; later calls may fail. The context
    /// can be cancelled to abandon setup. After a failed start the caller
    /// is responsible for calling [`Lifecycle::stop`] to release whatever
    /// was acquired.
    async fn start(&self, ctx: Context) -> Result<(), BoxError>;

    /// Stop the service gracefully.
    ///
    /// Cancelling `ctx` asks for an accelerated shutdown, but the service
    /// still has to stop completely before returning. Implementations may
    /// swallow the cancellation if they handle it well.
    async fn stop(&self, ctx: Context) -> Result<(), BoxError>;

    /// Whether [`Lifecycle::stop`] has completed.
    fn is_stopped(&self) -> bool;
}

#[async_trait]
impl<T> Lifecycle for Arc<T>
where
    T: Lifecycle + ?Sized,
{
    async fn start(&self, ctx: Context) -> Result<(), BoxError> {
        (**self).start(ctx).await
    }

    async fn stop(&self, ctx: Context) -> Result<(), BoxError> {
        (**self).stop(ctx).await
    }

    fn is_stopped(&self) -> bool {
        (**self).is_stopped()
    }
}

#[async_trait]
impl<T> Lifecycle for Box<T>
where
    T: Lifecycle + ?Sized,
{
    async fn start(&self, ctx: Context) -> Result<(), BoxError> {
        (**self).start(ctx).await
    }

    async fn stop(&self, ctx: Context) -> Result<(), BoxError> {
        (**self).stop(ctx).await
    }

    fn is_stopped(&self) -> bool {
        (**self).is_stopped()
    }
}
