//! Month grouping for the diary page.

use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const UNKNOWN_MONTH: &str = "Unknown";

/// `YYYY-MM` for a valid `YYYY-MM-DD` date, otherwise `None`.
#[must_use]
pub fn month_key(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m").to_string())
}

/// Groups items by watch month.
///
/// Items are first ordered by date descending (stable, blank dates last), so
/// each group keeps that order. Groups come newest month first, followed by an
/// `Unknown` group for blank or unparseable dates.
pub fn group_by_month<T, F>(mut items: Vec<T>, date_of: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| date_of(b).cmp(date_of(a)));

    let mut dated: BTreeMap<String, Vec<T>> = BTreeMap::new();
    let mut unknown = Vec::new();

    for item in items {
        match month_key(date_of(&item)) {
            Some(month) => dated.entry(month).or_default().push(item),
            None => unknown.push(item),
        }
    }

    let mut groups: Vec<(String, Vec<T>)> = dated.into_iter().rev().collect();
    if !unknown.is_empty() {
        groups.push((UNKNOWN_MONTH.to_string(), unknown));
    }
    groups
}
