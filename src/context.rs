//! Cancellable execution contexts that remember why they were cancelled.
//!
//! A [`Context`] wraps a [`CancellationToken`] and records an optional
//! cause alongside it. Children are cancelled together with their parent
//! and inherit the parent's cause. Cancelling a child never reaches back up
//! the tree, so a run scope and a stop scope derived from the same host stay
//! independent of each other.

use crate::error::Cause;
use parking_lot::Mutex;
use std::error::Error as StdError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
enum Cancellation {
    Pending,
    Cancelled(Option<Cause>),
}

#[derive(Debug)]
struct Inner {
    token: CancellationToken,
    parent: Option<Context>,
    state: Mutex<Cancellation>,
}

/// Snapshot of a context: whether it is done and the recorded cause.
///
/// `cause` is `None` both while the context is live and when it was
/// cancelled without a reason.
#[derive(Debug, Clone)]
pub struct ContextState {
    pub done: bool,
    pub cause: Option<Cause>,
}

/// Cancellable scope with causal error support
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// Create a root context. Nothing cancels it except an explicit call.
    pub fn new() -> Self {
        Self::from_token(CancellationToken::new(), None)
    }

    fn from_token(token: CancellationToken, parent: Option<Context>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token,
                parent,
                state: Mutex::new(Cancellation::Pending),
            }),
        }
    }

    /// Derive a child that is cancelled whenever this context is
    pub fn child(&self) -> Self {
        Self::from_token(self.inner.token.child_token(), Some(self.clone()))
    }

    /// Cancel without recording a cause
    pub fn cancel(&self) {
        self.cancel_inner(None);
    }

    /// Cancel and record `cause` as the reason.
    ///
    /// Only the first cancellation counts. If this context (or one of its
    /// ancestors) is already cancelled the call does nothing.
    pub fn cancel_with_cause<E>(&self, cause: E)
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cancel_inner(Some(Arc::new(cause)));
    }

    fn cancel_inner(&self, cause: Option<Cause>) {
        {
            let mut state = self.inner.state.lock();
            if matches!(*state, Cancellation::Cancelled(_)) || self.inner.token.is_cancelled() {
                return;
            }
            *state = Cancellation::Cancelled(cause);
        }
        self.inner.token.cancel();
    }

    pub fn is_done(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Wait until the context is cancelled.
    ///
    /// Resolves immediately if it already is. The wakeup can come from any
    /// task or thread holding a clone of this context or of an ancestor.
    pub async fn done(&self) {
        self.inner.token.cancelled().await;
    }

    /// Why the context was cancelled.
    ///
    /// Returns the cause recorded on this context, or the one inherited from
    /// the ancestor whose cancellation reached it. `None` when the context
    /// is still live or was cancelled without a cause.
    pub fn cause(&self) -> Option<Cause> {
        if !self.inner.token.is_cancelled() {
            return None;
        }

        if let Cancellation::Cancelled(cause) = &*self.inner.state.lock() {
            return cause.clone();
        }

        self.inner.parent.as_ref().and_then(Context::cause)
    }

    pub fn state(&self) -> ContextState {
        ContextState {
            done: self.is_done(),
            cause: self.cause(),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
