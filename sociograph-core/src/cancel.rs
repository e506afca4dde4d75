//! Cooperative cancellation for long-running traversals and simulations.
//!
//! Algorithms check for cancellation only at loop boundaries (per BFS source,
//! per component, per Monte Carlo trial), so a cancelled operation returns
//! promptly without leaving partial results behind.

use std::{
    convert::Infallible,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::error::GraphError;

/// Shared flag that asks in-flight operations to stop early.
///
/// Clones observe the same flag, so one handle can be passed to a worker
/// while another is kept by the caller.
///
/// # Examples
/// ```
/// use sociograph_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker = token.clone();
/// assert!(!worker.is_cancelled());
/// token.cancel();
/// assert!(worker.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the non-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every operation observing this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Loop-boundary check shared by the cancellable and plain algorithm entry
/// points.
pub(crate) trait Interrupt {
    type Error;

    fn checkpoint(&self) -> Result<(), Self::Error>;
}

/// Interrupt source that never fires.
pub(crate) struct Uninterruptible;

impl Interrupt for Uninterruptible {
    type Error = Infallible;

    #[inline]
    fn checkpoint(&self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Interrupt for CancellationToken {
    type Error = GraphError;

    #[inline]
    fn checkpoint(&self) -> Result<(), GraphError> {
        if self.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        Ok(())
    }
}

/// Unwraps a result whose error type cannot be constructed.
pub(crate) fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
