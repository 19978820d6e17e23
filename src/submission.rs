//! Submission workflow: validate, enrich, persist, surface state.
//!
//! One service instance tracks one submission flow the way the landing form
//! consumes it: a state machine `Idle → Submitting → {Success, Error}`
//! where terminal states only leave via a fresh [`SubmissionService::submit`]
//! call. Overlapping calls are not serialized; the most recently resolved
//! call wins the terminal state, and the consuming form gates repeats by
//! disabling its submit control while the state is `Submitting`.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use crate::backend::SubmissionStore;
use crate::config::GlobalConfig;
use crate::models::{SubmissionInput, SubmissionRecord};
use crate::net::fetch_client_ip;
use crate::validation::email_error;
use crate::AppError;

/// Lifecycle state of the current submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// No attempt in flight or resolved yet.
    Idle,
    /// Insert (and enrichment) in flight.
    Submitting,
    /// Last attempt persisted; [`SubmissionService::last_submission`] is set.
    Success,
    /// Last attempt failed; [`SubmissionService::error_message`] is set.
    Error,
}

/// Orchestrates a single form submission against the backend store.
pub struct SubmissionService {
    store: Option<Arc<dyn SubmissionStore>>,
    http: Client,
    config: GlobalConfig,
    state: SubmissionState,
    last_submission: Option<SubmissionRecord>,
    error_message: Option<String>,
}

impl SubmissionService {
    /// Build a service over an available backend store.
    #[must_use]
    pub fn new(store: Arc<dyn SubmissionStore>, config: GlobalConfig) -> Self {
        Self::build(Some(store), config)
    }

    /// Build a service whose backend never became available. Every submit
    /// resolves to the error state without network I/O.
    #[must_use]
    pub fn without_store(config: GlobalConfig) -> Self {
        Self::build(None, config)
    }

    fn build(store: Option<Arc<dyn SubmissionStore>>, config: GlobalConfig) -> Self {
        Self {
            store,
            http: Client::new(),
            config,
            state: SubmissionState::Idle,
            last_submission: None,
            error_message: None,
        }
    }

    /// Run the submission workflow for one form submit.
    ///
    /// The caller is expected to have validated `input.email` at the UI
    /// boundary; a defensive re-check still rejects malformed addresses
    /// before they reach the backend. IP enrichment is best-effort and
    /// never blocks past its own timeout or fails the submission.
    ///
    /// Returns the persisted record on success and `None` when the attempt
    /// resolved to the error state; no partial record is ever exposed.
    pub async fn submit(&mut self, input: SubmissionInput) -> Option<SubmissionRecord> {
        let Some(store) = self.store.clone() else {
            self.fail(AppError::BackendUnavailable("client not constructed".into()).to_string());
            return None;
        };

        self.state = SubmissionState::Submitting;
        self.error_message = None;

        if let Some(message) = email_error(&input.email) {
            self.fail(message);
            return None;
        }

        let mut input = input;
        if input.ip_address.is_none() {
            input.ip_address = fetch_client_ip(&self.http, &self.config).await;
        }

        match store.insert_returning(input.into_row()).await {
            Ok(row) => {
                let record = SubmissionRecord::from_row(row);
                info!(id = %record.id, variant = record.variant.as_str(), "submission persisted");
                self.last_submission = Some(record.clone());
                self.state = SubmissionState::Success;
                Some(record)
            }
            Err(err) => {
                warn!(%err, "submission insert failed");
                self.fail(err.to_string());
                None
            }
        }
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.state = SubmissionState::Error;
    }

    /// Current state of the submission attempt.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Record persisted by the most recently resolved successful attempt.
    #[must_use]
    pub fn last_submission(&self) -> Option<&SubmissionRecord> {
        self.last_submission.as_ref()
    }

    /// Message from the most recently resolved failed attempt.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Clear the displayed error; hosts call this from their auto-clear
    /// timer. Leaves the state machine untouched.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
