// Shared building blocks for the page calculators: quarter ordering,
// grouped averages, axis padding, rankings and period-over-period change.
//
// Everything here is a pure function of its inputs.
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::types::{AxisDomain, GroupAverageRow};

/// A `"Q<1-4> <YYYY>"` period. Orders by year, then quarter number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub number: u8,
}

impl Quarter {
    pub fn parse(label: &str) -> Option<Quarter> {
        let mut parts = label.split_whitespace();
        let q = parts.next()?;
        let year = parts.next()?.parse::<i32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        let number = q
            .strip_prefix('Q')
            .or_else(|| q.strip_prefix('q'))?
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=4).contains(n))?;
        Some(Quarter { year, number })
    }
}

impl FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quarter::parse(s).ok_or_else(|| format!("not a quarter label: {:?}", s))
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.number, self.year)
    }
}

/// Chronological comparison of quarter labels. Labels that do not parse
/// sort after all real quarters, lexically among themselves.
pub fn compare_quarter_labels(a: &str, b: &str) -> Ordering {
    match (Quarter::parse(a), Quarter::parse(b)) {
        (Some(qa), Some(qb)) => qa.cmp(&qb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_quarters(mut labels: Vec<String>) -> Vec<String> {
    labels.sort_by(|a, b| compare_quarter_labels(a, b));
    labels
}

/// Unique labels in chronological order.
pub fn distinct_quarters<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: HashSet<&str> = labels.into_iter().collect();
    sort_quarters(unique.into_iter().map(str::to_string).collect())
}

/// Unique labels that parse as quarters, oldest first. Anything else is
/// dropped, so `.pop()` yields the latest real quarter.
pub fn dated_quarters<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    distinct_quarters(labels.into_iter().filter(|l| Quarter::parse(l).is_some()))
}

/// Average of `value` per `key`, in key order. Groups are only created by
/// members, and a zero count still yields 0 rather than NaN.
pub fn group_average<T, K, V>(items: &[T], key: K, value: V) -> Vec<GroupAverageRow>
where
    K: Fn(&T) -> String,
    V: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for item in items {
        let e = groups.entry(key(item)).or_insert((0.0, 0));
        e.0 += value(item);
        e.1 += 1;
    }
    groups
        .into_iter()
        .map(|(group, (sum, count))| GroupAverageRow {
            group,
            average: if count > 0 { sum / count as f64 } else { 0.0 },
            count,
        })
        .collect()
}

/// `[floor(min) - 5, ceil(max) + 5]` with the lower bound held at 0.
/// No values gives the full `[0, 100]` percentage range.
pub fn axis_domain(values: &[f64]) -> AxisDomain {
    if values.is_empty() {
        return AxisDomain { min: 0.0, max: 100.0 };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    AxisDomain {
        min: (min.floor() - 5.0).max(0.0),
        max: max.ceil() + 5.0,
    }
}

/// The `n` largest items by `value`, largest first. Ties keep input order.
pub fn top_n<T, V>(items: &[T], n: usize, value: V) -> Vec<T>
where
    T: Clone,
    V: Fn(&T) -> f64,
{
    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by(|a, b| value(b).partial_cmp(&value(a)).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

/// `part` as a percentage of `total`; 0 when the total is not positive.
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Percent change from `previous` to `current`; 0 unless `previous > 0`.
pub fn qoq_delta(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Round half up to an integer.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}
