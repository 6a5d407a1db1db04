//! Time-windowed aggregation over a [`FilteredDataset`].
//!
//! Every view is a pure function of the filtered readings and a reference
//! instant `now`. Readings are bucketed into explicit accumulators keyed by a
//! calendar date, an hour of day, or an `MM-DD` label.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::filter::FilteredDataset;
use crate::reading::Reading;

/// Trailing window used for the daily-mean table and the extremes.
pub const MONTH_WINDOW_DAYS: i64 = 30;
/// Trailing window used for the hourly average.
pub const DAY_WINDOW_HOURS: i64 = 24;
/// Trailing window used for the two-week trend.
pub const TWO_WEEK_WINDOW_DAYS: i64 = 14;

/// Running count, sum and maximum for one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
    }

    /// Arithmetic mean of the pushed values. Returns 0.0 for an empty bucket.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

/// A read-only aggregation: bucket key mapped to a temperature, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeWindowView<K> {
    pub points: Vec<(K, f64)>,
}

impl<K> TimeWindowView<K> {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl<K: Display> TimeWindowView<K> {
    /// Points as `(label, value)` pairs, the shape the chart renderer consumes.
    pub fn labeled(&self) -> Vec<(String, f64)> {
        self.points
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}

/// Hottest and coolest reading of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremes {
    pub max: Reading,
    pub min: Reading,
}

/// Readings with `timestamp >= now - span`, in source order.
pub fn trailing_window<'a>(
    data: &FilteredDataset<'a>,
    now: NaiveDateTime,
    span: Duration,
) -> Vec<&'a Reading> {
    let start = now - span;
    data.iter().filter(|r| r.timestamp >= start).collect()
}

/// The last [`MONTH_WINDOW_DAYS`] days of readings.
pub fn month_window<'a>(data: &FilteredDataset<'a>, now: NaiveDateTime) -> Vec<&'a Reading> {
    trailing_window(data, now, Duration::days(MONTH_WINDOW_DAYS))
}

/// Mean temperature per calendar date, ordered by date.
pub fn daily_mean(window: &[&Reading]) -> TimeWindowView<NaiveDate> {
    let buckets = bucket_sorted(window, |r| r.timestamp.date());
    TimeWindowView {
        points: buckets.into_iter().map(|(d, acc)| (d, acc.mean())).collect(),
    }
}

/// Max and min reading of `window`; the first occurrence wins a tie.
/// `None` when the window is empty.
pub fn extremes(window: &[&Reading]) -> Option<Extremes> {
    let (first, rest) = window.split_first()?;
    let mut max = *first;
    let mut min = *first;

    for &r in rest {
        if r.temperature > max.temperature {
            max = r;
        }
        if r.temperature < min.temperature {
            min = r;
        }
    }

    Some(Extremes {
        max: max.clone(),
        min: min.clone(),
    })
}

/// Mean temperature per hour of day over the last [`DAY_WINDOW_HOURS`] hours.
///
/// Buckets on the hour component alone, so readings from the same hour on
/// two calendar days share a bucket.
pub fn hourly_mean(data: &FilteredDataset<'_>, now: NaiveDateTime) -> TimeWindowView<u32> {
    let window = trailing_window(data, now, Duration::hours(DAY_WINDOW_HOURS));
    let buckets = bucket_sorted(&window, |r| r.timestamp.hour());
    TimeWindowView {
        points: buckets.into_iter().map(|(h, acc)| (h, acc.mean())).collect(),
    }
}

/// Mean temperature per `MM-DD` label over the last [`TWO_WEEK_WINDOW_DAYS`] days,
/// ordered by the first appearance of each label.
pub fn two_week_trend(data: &FilteredDataset<'_>, now: NaiveDateTime) -> TimeWindowView<String> {
    let window = trailing_window(data, now, Duration::days(TWO_WEEK_WINDOW_DAYS));

    let mut order: Vec<(String, Accumulator)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for r in window {
        let key = r.timestamp.format("%m-%d").to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            order.push((key, Accumulator::default()));
            order.len() - 1
        });
        order[slot].1.push(r.temperature);
    }

    TimeWindowView {
        points: order.into_iter().map(|(k, acc)| (k, acc.mean())).collect(),
    }
}

/// Maximum temperature per calendar date over every filtered reading.
pub fn daily_max(data: &FilteredDataset<'_>) -> TimeWindowView<NaiveDate> {
    let readings: Vec<&Reading> = data.iter().collect();
    let buckets = bucket_sorted(&readings, |r| r.timestamp.date());
    TimeWindowView {
        points: buckets.into_iter().map(|(d, acc)| (d, acc.max)).collect(),
    }
}

fn bucket_sorted<K: Ord>(
    readings: &[&Reading],
    key: impl Fn(&Reading) -> K,
) -> BTreeMap<K, Accumulator> {
    let mut buckets: BTreeMap<K, Accumulator> = BTreeMap::new();
    for r in readings {
        buckets.entry(key(*r)).or_default().push(r.temperature);
    }
    buckets
}
