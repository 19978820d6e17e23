//! Derived aggregate shapes for the admin dashboard and analytics views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::submission::Variant;

/// Per-variant submission totals. Both arms are always present, zeroed when
/// absent from the input set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct VariantTotals {
    /// Submissions tagged `variant_a`.
    pub variant_a: u64,
    /// Submissions tagged `variant_b`.
    pub variant_b: u64,
}

impl VariantTotals {
    /// Bump the counter for one arm.
    pub fn increment(&mut self, variant: Variant) {
        match variant {
            Variant::VariantA => self.variant_a += 1,
            Variant::VariantB => self.variant_b += 1,
        }
    }

    /// Combined count across both arms.
    #[must_use]
    pub fn total(self) -> u64 {
        self.variant_a + self.variant_b
    }
}

/// One time bucket on the submissions-over-time chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimelinePoint {
    /// Bucket start instant.
    pub timestamp: DateTime<Utc>,
    /// `variant_a` submissions inside the bucket.
    pub variant_a: u64,
    /// `variant_b` submissions inside the bucket.
    pub variant_b: u64,
}

/// Submission count for one placement tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LocationStat {
    /// Placement tag, or [`crate::analytics::UNTAGGED_LOCATION`] when the
    /// submission carried none.
    pub location: String,
    /// Submissions attributed to the tag.
    pub count: u64,
}
