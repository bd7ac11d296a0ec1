//! Cancellation scopes tied to a view's visible lifetime.

use std::future::Future;

pub use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Cancellation scope owned by one mounted view.
///
/// Every operation runs on a child token of the scope. Tearing the view down
/// cancels the scope and with it every in-flight child; a dropped scope is
/// torn down as well.
#[derive(Debug, Default)]
pub struct ViewScope {
    root: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh token for a single operation.
    pub fn operation_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Handle that tears the view down from outside the controller,
    /// e.g. from a navigation or Ctrl-C task while an operation is awaiting.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.root.clone()
    }

    pub fn teardown(&self) {
        self.root.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// Drive `future` to completion unless `token` is cancelled first.
///
/// A token that is already cancelled short-circuits without polling the
/// future at all.
pub async fn run_cancellable<T, F>(token: Option<&CancellationToken>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(token) = token else {
        return future.await;
    };
    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }

    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn runs_to_completion_without_token() {
        let value = run_cancellable(None, async { Ok(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn pre_cancelled_token_skips_the_future() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = AtomicBool::new(false);
        let result = run_cancellable(Some(&token), async {
            polled.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert_eq!(result, Err(Error::Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn teardown_interrupts_pending_operation() {
        let scope = ViewScope::new();
        let token = scope.operation_token();
        let handle = scope.teardown_handle();

        let pending = run_cancellable(Some(&token), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        let (result, ()) = tokio::join!(pending, async move { handle.cancel() });

        assert_eq!(result, Err(Error::Cancelled));
        assert!(scope.is_torn_down());
    }

    #[test]
    fn dropping_scope_cancels_children() {
        let scope = ViewScope::new();
        let token = scope.operation_token();
        drop(scope);
        assert!(token.is_cancelled());
    }
}
