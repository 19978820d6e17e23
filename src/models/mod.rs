//! Domain model module declarations.

pub mod filters;
pub mod stats;
pub mod submission;

pub use filters::SubmissionFilters;
pub use stats::{LocationStat, TimelinePoint, VariantTotals};
pub use submission::{
    records_from_rows, NewSubmissionRow, SubmissionInput, SubmissionRecord, SubmissionRow, Variant,
};
