//! Submission entities and the persisted-row normalization boundary.
//!
//! Application code speaks camelCase ([`SubmissionInput`],
//! [`SubmissionRecord`]); the backend table speaks snake_case
//! ([`NewSubmissionRow`], [`SubmissionRow`]). The conversions here are the
//! only place the two conventions meet: they rename
//! `locationTag`↔`location_tag`, `ipAddress`↔`ip_address`,
//! `userAgent`↔`user_agent`, pass every other field through unchanged, and
//! perform no validation and no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Simulation arm a submission is tagged with; fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// First messaging arm.
    VariantA,
    /// Second messaging arm.
    VariantB,
}

impl Variant {
    /// Both known arms, in canonical order.
    pub const ALL: [Self; 2] = [Self::VariantA, Self::VariantB];

    /// Wire name of the arm, as stored in the `variant` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VariantA => "variant_a",
            Self::VariantB => "variant_b",
        }
    }
}

/// Client-authored submission, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    /// Visitor email; expected to have passed UI-level validation.
    pub email: String,
    /// Simulation arm shown to the visitor.
    pub variant: Variant,
    /// Physical QR placement that produced this submission, if tagged.
    #[serde(default)]
    pub location_tag: Option<String>,
    /// Best-effort public IP of the submitter.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Browser user agent captured at submit time.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl SubmissionInput {
    /// Convert to the persisted insert shape.
    ///
    /// Absent or empty optional fields become explicit nulls on the wire,
    /// never missing keys.
    #[must_use]
    pub fn into_row(self) -> NewSubmissionRow {
        NewSubmissionRow {
            email: self.email,
            variant: self.variant,
            location_tag: self.location_tag.filter(|tag| !tag.is_empty()),
            ip_address: self.ip_address.filter(|ip| !ip.is_empty()),
            user_agent: self.user_agent.filter(|ua| !ua.is_empty()),
        }
    }
}

/// Insert payload for the submissions table. Server-generated columns
/// (`id`, `timestamp`, `revealed`) are deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewSubmissionRow {
    /// Visitor email.
    pub email: String,
    /// Simulation arm.
    pub variant: Variant,
    /// Optional placement tag; serialized as `null` when unset.
    pub location_tag: Option<String>,
    /// Optional submitter IP; serialized as `null` when unset.
    pub ip_address: Option<String>,
    /// Optional browser user agent; serialized as `null` when unset.
    pub user_agent: Option<String>,
}

/// Row shape returned by the backend for the submissions table.
///
/// Nullable columns default to `None` when a row omits them, so partial
/// rows normalize to explicit absence rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SubmissionRow {
    /// Backend-assigned unique identifier; immutable.
    pub id: String,
    /// Visitor email.
    pub email: String,
    /// Simulation arm; fixed at creation.
    pub variant: Variant,
    /// Optional placement tag.
    #[serde(default)]
    pub location_tag: Option<String>,
    /// Optional submitter IP.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Optional browser user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Backend-assigned insertion instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the submitter has been notified of the simulation; the only
    /// field mutable after creation, via the admin reveal toggle.
    #[serde(default)]
    pub revealed: bool,
}

/// Canonical post-persistence submission used everywhere in application code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Backend-assigned unique identifier.
    pub id: String,
    /// Visitor email.
    pub email: String,
    /// Simulation arm.
    pub variant: Variant,
    /// Optional placement tag.
    #[serde(default)]
    pub location_tag: Option<String>,
    /// Optional submitter IP.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Optional browser user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Backend-assigned insertion instant.
    pub timestamp: DateTime<Utc>,
    /// Whether the submitter has been notified of the simulation.
    pub revealed: bool,
}

impl SubmissionRecord {
    /// Normalize a persisted row back to the application shape, preserving
    /// `id`, `timestamp`, and `revealed` verbatim.
    #[must_use]
    pub fn from_row(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            variant: row.variant,
            location_tag: row.location_tag,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            timestamp: row.timestamp,
            revealed: row.revealed,
        }
    }
}

/// Normalize a batch of persisted rows, preserving input order.
#[must_use]
pub fn records_from_rows(rows: Vec<SubmissionRow>) -> Vec<SubmissionRecord> {
    rows.into_iter().map(SubmissionRecord::from_row).collect()
}
