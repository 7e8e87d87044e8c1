//! Cancellation signal for long-running operations

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of a cancellation signal.
///
/// Clones share the same signal. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Signals cancellation to every receiver.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`CancellationToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Returns a receiver observing this token.
    #[must_use]
    pub fn receiver(&self) -> CancellationReceiver {
        CancellationReceiver {
            receiver: Some(self.sender.subscribe()),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of a cancellation signal.
#[derive(Debug)]
pub struct CancellationReceiver {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancellationReceiver {
    /// A receiver that is never cancelled.
    #[must_use]
    pub const fn never() -> Self {
        Self { receiver: None }
    }

    /// Completes once cancellation has been signalled.
    ///
    /// Pends forever if the token was dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if let Some(receiver) = self.receiver.as_mut() {
            let signalled = receiver.wait_for(|cancelled| *cancelled).await.is_ok();
            if signalled {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}
