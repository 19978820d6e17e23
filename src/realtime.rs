//! Realtime bridge: forwards backend insert events to a registered callback.

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::SubmissionStore;
use crate::models::SubmissionRecord;

/// Handle for an active realtime subscription.
///
/// Dropping the handle or calling [`unsubscribe`](Self::unsubscribe) stops
/// further callback invocations and releases the consumer task. Teardown is
/// idempotent: a second call (or drop after an explicit call) is a no-op,
/// and it is safe even if the consumer already exited on its own.
pub struct RealtimeSubscription {
    cancel: CancellationToken,
}

impl RealtimeSubscription {
    /// Stop delivering events. Safe to call more than once.
    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Register `callback` for newly inserted submissions.
///
/// Each backend-pushed insert is normalized to a [`SubmissionRecord`] and
/// the callback invoked exactly once per event, in arrival order, until the
/// returned handle is dropped or unsubscribed.
pub fn subscribe<F>(store: &dyn SubmissionStore, mut callback: F) -> RealtimeSubscription
where
    F: FnMut(SubmissionRecord) + Send + 'static,
{
    let mut events = store.insert_events();
    let cancel = CancellationToken::new();
    let consumer_cancel = cancel.clone();

    let _consumer = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = consumer_cancel.cancelled() => {
                    debug!("realtime subscription released");
                    break;
                }
                event = events.recv() => match event {
                    Ok(row) => callback(SubmissionRecord::from_row(row)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "realtime feed lagged; events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("realtime feed closed");
                        break;
                    }
                }
            }
        }
    });

    RealtimeSubscription { cancel }
}
