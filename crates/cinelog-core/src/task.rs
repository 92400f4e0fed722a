//! Cancellable background fetches.
//!
//! A view that starts requests owns a [`ConsumerScope`]. When the view goes
//! away the scope is dropped, every task spawned through it is cancelled,
//! and late results are discarded instead of being applied to stale state.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A spawned future that can be abandoned
pub struct FetchTask<T> {
    token: CancellationToken,
    handle: JoinHandle<Option<T>>,
}

impl<T> FetchTask<T>
where
    T: Send + 'static,
{
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::spawn_with_token(future, CancellationToken::new())
    }

    pub fn spawn_with_token<F>(future: F, token: CancellationToken) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => None,
                value = future => Some(value),
            }
        });
        Self { token, handle }
    }

    /// Safe to call any number of times
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result; `None` once the task has been cancelled, even if
    /// the future itself completed in the meantime.
    pub async fn join(self) -> Option<T> {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(operation = "fetch_task", error = %e, "Fetch task failed");
                None
            }
        };
        if self.token.is_cancelled() {
            debug!(operation = "fetch_task", "Discarding result of cancelled fetch");
            return None;
        }
        result
    }
}

/// Owner of a group of fetches; dropping it cancels all of them
#[derive(Default)]
pub struct ConsumerScope {
    token: CancellationToken,
}

impl ConsumerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F, T>(&self, future: F) -> FetchTask<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        FetchTask::spawn_with_token(future, self.token.child_token())
    }

    /// Token for work that is not a [`FetchTask`] (timers, loops)
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ConsumerScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
