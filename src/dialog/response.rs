//! Single-assignment completion cell bridging UI events to awaiting callers

use super::types::{DialogError, DialogId, DialogResult, DialogValue};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Snapshot of a dialog's answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub done: bool,
    pub value: DialogValue,
}

/// Partial update merged into the response; only a `done` update settles it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseUpdate {
    pub done: bool,
    pub value: Option<DialogValue>,
}

#[derive(Debug, Default)]
struct Inner {
    response: Response,
    waiters: Vec<oneshot::Sender<DialogValue>>,
    abandoned: bool,
}

/// Completion cell shared by a dialog session and whoever awaits it
#[derive(Debug, Clone)]
pub struct ResponseChannel {
    id: DialogId,
    inner: Arc<Mutex<Inner>>,
}

impl ResponseChannel {
    pub fn new(id: DialogId) -> Self {
        Self {
            id,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    /// Settle the response. A second call is rejected and leaves the first
    /// value in place.
    pub fn complete(&self, value: DialogValue) -> DialogResult<()> {
        self.apply(ResponseUpdate {
            done: true,
            value: Some(value),
        })
    }

    /// Merge an update; resolves every waiter once `done` is set
    pub fn apply(&self, update: ResponseUpdate) -> DialogResult<()> {
        let mut inner = self.lock();
        if inner.response.done {
            warn!(dialog_id = %self.id, "Ignoring update to a completed dialog response");
            return Err(DialogError::AlreadyCompleted(self.id.clone()));
        }

        if let Some(value) = update.value {
            inner.response.value = value;
        }
        if !update.done {
            return Ok(());
        }

        inner.response.done = true;
        let value = inner.response.value.clone();
        let waiters = std::mem::take(&mut inner.waiters);
        drop(inner);

        debug!(dialog_id = %self.id, %value, waiters = waiters.len(), "Dialog response completed");
        for waiter in waiters {
            let _ = waiter.send(value.clone());
        }
        Ok(())
    }

    /// Current state of the response
    pub fn response(&self) -> Response {
        self.lock().response.clone()
    }

    pub fn is_done(&self) -> bool {
        self.lock().response.done
    }

    /// Release waiters of a response that will never complete
    pub fn abandon(&self) {
        let mut inner = self.lock();
        if inner.response.done {
            return;
        }
        inner.abandoned = true;
        inner.waiters.clear();
    }

    /// Wait for the final value
    pub async fn wait(&self) -> DialogResult<DialogValue> {
        let receiver = {
            let mut inner = self.lock();
            if inner.response.done {
                return Ok(inner.response.value.clone());
            }
            if inner.abandoned {
                return Err(DialogError::Abandoned(self.id.clone()));
            }
            let (sender, receiver) = oneshot::channel();
            inner.waiters.push(sender);
            receiver
        };

        receiver
            .await
            .map_err(|_| DialogError::Abandoned(self.id.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_complete_is_single_assignment() {
        let channel = ResponseChannel::new(DialogId::new());
        assert_eq!(channel.response(), Response::default());

        channel.complete(DialogValue::Bool(true)).unwrap();
        let second = channel.complete(DialogValue::Bool(false));

        assert_eq!(second, Err(DialogError::AlreadyCompleted(channel.id().clone())));
        assert_eq!(
            channel.response(),
            Response {
                done: true,
                value: DialogValue::Bool(true),
            }
        );
    }

    #[test]
    fn test_partial_updates_merge_before_completion() {
        let channel = ResponseChannel::new(DialogId::new());

        channel
            .apply(ResponseUpdate {
                done: false,
                value: Some(DialogValue::Text("draft".to_string())),
            })
            .unwrap();
        assert!(!channel.is_done());

        channel
            .apply(ResponseUpdate {
                done: true,
                value: None,
            })
            .unwrap();
        assert_eq!(channel.response().value, DialogValue::Text("draft".to_string()));
    }

    #[tokio::test]
    async fn test_wait_resolves_on_completion() {
        let channel = ResponseChannel::new(DialogId::new());
        let waiter = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.wait().await })
        };

        tokio::task::yield_now().await;
        channel.complete(DialogValue::Text("hi".to_string())).unwrap();

        let value = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value, Ok(DialogValue::Text("hi".to_string())));
    }

    #[tokio::test]
    async fn test_wait_after_completion_returns_immediately() {
        let channel = ResponseChannel::new(DialogId::new());
        channel.complete(DialogValue::Null).unwrap();

        assert_eq!(channel.wait().await, Ok(DialogValue::Null));
        assert_eq!(channel.wait().await, Ok(DialogValue::Null));
    }

    #[tokio::test]
    async fn test_abandon_releases_waiters() {
        let channel = ResponseChannel::new(DialogId::new());
        let waiter = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.wait().await })
        };

        tokio::task::yield_now().await;
        channel.abandon();

        let result = waiter.await.unwrap();
        assert_eq!(result, Err(DialogError::Abandoned(channel.id().clone())));
        assert_eq!(
            channel.wait().await,
            Err(DialogError::Abandoned(channel.id().clone()))
        );
    }
}
