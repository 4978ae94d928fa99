//! Single-flight operation chain.
//!
//! Every public operation on a token cache or account store is a
//! read-modify-write against external storage. Running two of them at once
//! lets both read the same base state and the later write silently drops the
//! earlier one. [`OperationChain`] runs them one at a time, in the order they
//! were called.
//!
//! Each link is spawned onto the tokio runtime when
//! [`OperationChain::enqueue`] is called. It runs whether or not the caller
//! ever polls the returned future, so
//! `let a = cache.add(..); let b = cache.remove(..);` runs `a` before `b`
//! and `b.await` completes even while `a` is still unawaited. Dropping the
//! returned future does not cancel the operation.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A queued operation did not settle within the chain's timeout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation on '{chain}' timed out after {after:?}")]
pub struct OperationTimedOut {
    pub chain: String,
    pub after: Duration,
}

/// A queued operation was cancelled before it settled (runtime shutdown).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation on '{chain}' was aborted")]
pub struct OperationAborted {
    pub chain: String,
}

/// FIFO serializer for async operations on one component instance.
pub struct OperationChain {
    name: String,
    timeout: Option<Duration>,
    /// Completion signal of the most recently enqueued link.
    tail: Mutex<Option<oneshot::Receiver<()>>>,
}

impl OperationChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout: None,
            tail: Mutex::new(None),
        }
    }

    /// Fail any single operation that runs longer than `timeout` and move on
    /// to the next one. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `operation` to the chain.
    ///
    /// The operation is spawned immediately. It waits for every previously
    /// enqueued operation to settle (successfully, with an error, or by
    /// panicking), then runs. Errors are logged here and handed back to the
    /// caller; they never block later links. A panic inside `operation` is
    /// resumed on the task awaiting the returned future.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue<F, T, E>(&self, operation: F) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<OperationTimedOut> + From<OperationAborted> + fmt::Display + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let previous = self
            .tail
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(done_rx);
        let name = self.name.clone();
        let timeout = self.timeout;

        let link = tokio::spawn(async move {
            if let Some(previous) = previous {
                // A closed channel means the previous link panicked or was aborted.
                let _ = previous.await;
            }

            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, operation).await {
                    Ok(result) => result,
                    Err(_) => Err(OperationTimedOut {
                        chain: name.clone(),
                        after: limit,
                    }
                    .into()),
                },
                None => operation.await,
            };

            match &result {
                Ok(_) => debug!(chain = %name, "queued operation settled"),
                Err(err) => warn!(chain = %name, error = %err, "queued operation failed"),
            }

            // The next link only needs the signal; nobody waiting is fine.
            let _ = done_tx.send(());
            result
        });

        let chain = self.name.clone();
        async move {
            match link.await {
                Ok(result) => result,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => Err(OperationAborted { chain }.into()),
            }
        }
    }
}

impl fmt::Debug for OperationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationChain")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}
