//! Admin-side query service over stored submissions.

use std::sync::Arc;

use tracing::warn;

use crate::backend::SubmissionStore;
use crate::models::{records_from_rows, SubmissionFilters, SubmissionRecord};

/// Fetches stored submissions for the admin table and drives the reveal
/// toggle. Backend failures surface as a component-local error message and
/// an empty result, never as an `Err` to the consuming view.
pub struct QueryService {
    store: Arc<dyn SubmissionStore>,
    error_message: Option<String>,
}

impl QueryService {
    /// Build a service over the backend store.
    #[must_use]
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            store,
            error_message: None,
        }
    }

    /// Fetch submissions matching `filters`, newest first.
    ///
    /// Filters combine conjunctively; an offset without a limit is bounded
    /// by the default page size. On backend error the message is recorded
    /// and an empty list returned.
    pub async fn submissions(&mut self, filters: SubmissionFilters) -> Vec<SubmissionRecord> {
        match self.store.select(filters).await {
            Ok(rows) => {
                self.error_message = None;
                records_from_rows(rows)
            }
            Err(err) => {
                warn!(%err, "submission query failed");
                self.error_message = Some(err.to_string());
                Vec::new()
            }
        }
    }

    /// Flip the reveal flag on one submission; the admin's only mutation.
    ///
    /// Returns the updated record, or `None` (with the error message
    /// recorded) when the backend rejects the update.
    pub async fn toggle_reveal(&mut self, id: &str, revealed: bool) -> Option<SubmissionRecord> {
        match self.store.set_revealed(id, revealed).await {
            Ok(row) => {
                self.error_message = None;
                Some(SubmissionRecord::from_row(row))
            }
            Err(err) => {
                warn!(%err, id, "reveal toggle failed");
                self.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Message from the most recent failed backend call.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
