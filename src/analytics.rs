//! Pure aggregation over submission records for the dashboard charts.
//!
//! Everything here is deterministic with respect to input order and never
//! produces an empty series: charting consumers always get at least one
//! zeroed bucket to render.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::models::{LocationStat, SubmissionRecord, TimelinePoint, VariantTotals};

/// Bucket label for submissions without a location tag.
pub const UNTAGGED_LOCATION: &str = "untagged";

/// Per-variant totals with both arms present, zeroed when absent.
#[must_use]
pub fn compute_totals(records: &[SubmissionRecord]) -> VariantTotals {
    let mut totals = VariantTotals::default();
    for record in records {
        totals.increment(record.variant);
    }
    totals
}

/// Hourly per-variant counts, chronological. Empty input yields one zeroed
/// bucket at the current hour.
#[must_use]
pub fn compute_timeline(records: &[SubmissionRecord]) -> Vec<TimelinePoint> {
    if records.is_empty() {
        return vec![TimelinePoint {
            timestamp: hour_bucket(Utc::now()),
            variant_a: 0,
            variant_b: 0,
        }];
    }

    let mut buckets: BTreeMap<DateTime<Utc>, VariantTotals> = BTreeMap::new();
    for record in records {
        buckets
            .entry(hour_bucket(record.timestamp))
            .or_default()
            .increment(record.variant);
    }

    buckets
        .into_iter()
        .map(|(timestamp, totals)| TimelinePoint {
            timestamp,
            variant_a: totals.variant_a,
            variant_b: totals.variant_b,
        })
        .collect()
}

/// Submission counts per location tag, descending by count (ties broken by
/// tag name for determinism). Untagged records group under
/// [`UNTAGGED_LOCATION`]; empty input yields one zeroed entry.
#[must_use]
pub fn compute_location_stats(records: &[SubmissionRecord]) -> Vec<LocationStat> {
    if records.is_empty() {
        return vec![LocationStat {
            location: UNTAGGED_LOCATION.into(),
            count: 0,
        }];
    }

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        let tag = record.location_tag.as_deref().unwrap_or(UNTAGGED_LOCATION);
        *counts.entry(tag).or_default() += 1;
    }

    let mut stats: Vec<LocationStat> = counts
        .into_iter()
        .map(|(location, count)| LocationStat {
            location: location.to_owned(),
            count,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    stats
}

fn hour_bucket(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::hours(1))
        .unwrap_or(instant)
}
