use std::future::Future;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::error::{FlashcardError, Result};

/// Handle to a recognition or capture running in the background.
///
/// Dropping it does not stop the work; call [`PendingTask::cancel`] for that.
pub struct PendingTask<T> {
    handle: JoinHandle<Result<T>>,
    cancel_token: CancellationToken,
}

impl<T: Send + 'static> PendingTask<T> {
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => Err(FlashcardError::Cancelled),
                result = work => result,
            }
        });

        Self {
            handle,
            cancel_token,
        }
    }

    /// Abandons the task. A blocking stage already running finishes on its own
    /// thread, but its result is thrown away.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(join_error(err)),
        }
    }
}

/// Cancelled joins become `Cancelled`; panics keep unwinding in the caller.
pub(crate) fn join_error(err: JoinError) -> FlashcardError {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    FlashcardError::Cancelled
}
