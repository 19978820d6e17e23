//! Backend persistence/query/realtime collaborator abstraction.
//!
//! The [`SubmissionStore`] trait decouples the services (submission, query,
//! realtime bridge) from the hosted backend. The shipped implementation is
//! [`supabase::SupabaseStore`]; tests substitute in-memory stubs.

pub mod global;
pub mod supabase;

use std::future::Future;
use std::pin::Pin;

use tokio::sync::broadcast;

use crate::models::{NewSubmissionRow, SubmissionFilters, SubmissionRow};
use crate::Result;

/// Persistence, query, and insert-push interface over the submissions table.
pub trait SubmissionStore: Send + Sync {
    /// Insert one row and return it with backend-assigned `id`,
    /// `timestamp`, and `revealed` populated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) if
    /// the backend rejects the insert, or
    /// [`AppError::Network`](crate::AppError::Network) on transport failure.
    fn insert_returning(
        &self,
        row: NewSubmissionRow,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionRow>> + Send + '_>>;

    /// Fetch rows matching `filters`, newest first by `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) if
    /// the backend rejects the query, or
    /// [`AppError::Network`](crate::AppError::Network) on transport failure.
    fn select(
        &self,
        filters: SubmissionFilters,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SubmissionRow>>> + Send + '_>>;

    /// Flip the reveal flag on one row and return the updated row. No other
    /// column is touched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`](crate::AppError::NotFound) if `id`
    /// matches no row, or
    /// [`AppError::Persistence`](crate::AppError::Persistence) /
    /// [`AppError::Network`](crate::AppError::Network) as above.
    fn set_revealed(
        &self,
        id: &str,
        revealed: bool,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionRow>> + Send + '_>>;

    /// Subscribe to the push feed of newly inserted rows, in insertion
    /// order. Each call returns an independent receiver.
    fn insert_events(&self) -> broadcast::Receiver<SubmissionRow>;
}
