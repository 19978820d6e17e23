//! Query filters for the admin submission list.

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_PAGE_SIZE;

use super::submission::{SubmissionRecord, Variant};

/// Filter predicates for fetching stored submissions.
///
/// Each filter is independently optional and combined with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilters {
    /// Exact-match simulation arm.
    pub variant: Option<Variant>,
    /// Inclusive lower timestamp bound.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub end_date: Option<DateTime<Utc>>,
    /// Exact-match placement tag.
    pub location_tag: Option<String>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
    /// Rows to skip before the page starts.
    pub offset: Option<u64>,
}

impl SubmissionFilters {
    /// Row cap for the query: the explicit limit, or the default page size
    /// when only an offset was given, or no cap at all.
    #[must_use]
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.or_else(|| self.offset.map(|_| DEFAULT_PAGE_SIZE))
    }

    /// Whether a record satisfies every predicate except pagination.
    #[must_use]
    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        if self.variant.is_some_and(|v| v != record.variant) {
            return false;
        }

        if self.start_date.is_some_and(|start| record.timestamp < start) {
            return false;
        }

        if self.end_date.is_some_and(|end| record.timestamp > end) {
            return false;
        }

        if self
            .location_tag
            .as_deref()
            .is_some_and(|tag| record.location_tag.as_deref() != Some(tag))
        {
            return false;
        }

        true
    }
}
