//! Chronological ordering of sibling messages.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Compare two optional send times.
///
/// Parsed timestamps sort ascending; a missing timestamp sorts after every
/// parsed one, as if it were the maximal instant.
pub fn compare_timestamps(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of ids by timestamp; equal keys keep their current order.
pub fn sort_by_timestamp<F>(ids: &mut [String], mut timestamp_of: F)
where
    F: FnMut(&str) -> Option<DateTime<Utc>>,
{
    let mut keyed: Vec<(Option<DateTime<Utc>>, String)> = ids
        .iter_mut()
        .map(|id| (timestamp_of(id.as_str()), std::mem::take(id)))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_timestamps(a.as_ref(), b.as_ref()));

    for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
        *slot = id;
    }
}
