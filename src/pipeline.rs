//! In-memory transforms over an already-fetched metric list.
//!
//! Everything here is pure and total: empty or partial datasets produce empty
//! or default results instead of panicking.

use crate::models::{FingerUsage, Hand, Id, Metric, MetricField};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};

/// First record whose triple matches exactly.
pub fn find_metric(metrics: &[Metric], corpus: Id, keyboard: Id, layout: Id) -> Option<&Metric> {
    metrics.iter().find(|m| m.matches(corpus, keyboard, layout))
}

/// Triples that occur more than once, in first-seen order.
pub fn duplicate_triples(metrics: &[Metric]) -> Vec<(Id, Id, Id)> {
    let mut seen: HashMap<(Id, Id, Id), usize> = HashMap::new();
    let mut dupes = Vec::new();
    for m in metrics {
        let count = seen.entry(m.triple()).or_insert(0);
        *count += 1;
        if *count == 2 {
            dupes.push(m.triple());
        }
    }
    dupes
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl Default for MetricRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl MetricRange {
    /// Position of `value` inside the range, clamped to `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.is_nan() || span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Min/max of the defined values of `field` across all records.
///
/// A single distinct value is widened by `max(|v| * 0.1, 1)` on each side so
/// the range never has zero width.
pub fn metric_range(metrics: &[Metric], field: MetricField) -> MetricRange {
    let mut values = metrics.iter().filter_map(|m| m.value(field));
    let Some(first) = values.next() else {
        return MetricRange::default();
    };

    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min < max {
        MetricRange { min, max }
    } else {
        let pad = (min.abs() * 0.1).max(1.0);
        MetricRange {
            min: min - pad,
            max: max + pad,
        }
    }
}

pub fn metric_ranges(metrics: &[Metric]) -> BTreeMap<MetricField, MetricRange> {
    MetricField::iter()
        .map(|field| (field, metric_range(metrics, field)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTone {
    Better,
    Worse,
    Neutral,
}

/// Delta between the value under inspection and a reference value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDiff {
    pub current: f64,
    pub reference: f64,
    pub delta: f64,
    pub more_is_worse: bool,
}

impl MetricDiff {
    pub fn new(current: f64, reference: f64, more_is_worse: bool) -> Self {
        Self {
            current,
            reference,
            delta: current - reference,
            more_is_worse,
        }
    }

    /// Both sides are shares, so the delta reads as percentage points.
    pub fn is_fraction(&self) -> bool {
        (0.0..=1.0).contains(&self.current) && (0.0..=1.0).contains(&self.reference)
    }

    pub fn display(&self) -> String {
        format_diff(self.current, self.reference)
    }

    pub fn tone(&self) -> DiffTone {
        if rounded_magnitude(self.scaled_delta()) == "0.0" {
            return DiffTone::Neutral;
        }
        match (self.delta > 0.0, self.more_is_worse) {
            (true, true) | (false, false) => DiffTone::Worse,
            (true, false) | (false, true) => DiffTone::Better,
        }
    }

    fn scaled_delta(&self) -> f64 {
        if self.is_fraction() {
            self.delta * 100.0
        } else {
            self.delta
        }
    }
}

fn rounded_magnitude(x: f64) -> String {
    format!("{:.1}", x.abs())
}

/// `+4.3%` for fractions, `+0.4u` for distances. Zero shows unsigned.
pub fn format_diff(current: f64, reference: f64) -> String {
    let diff = MetricDiff::new(current, reference, false);
    let unit = if diff.is_fraction() { "%" } else { "u" };
    let scaled = diff.scaled_delta();
    let magnitude = rounded_magnitude(scaled);

    if magnitude == "0.0" {
        format!("{}{}", magnitude, unit)
    } else if scaled > 0.0 {
        format!("+{}{}", magnitude, unit)
    } else {
        format!("-{}{}", magnitude, unit)
    }
}

/// One row of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub field: MetricField,
    pub current: Option<f64>,
    pub reference: Option<f64>,
    pub diff: Option<MetricDiff>,
}

pub fn compare_metrics(current: &Metric, reference: &Metric) -> Vec<ComparisonRow> {
    MetricField::iter()
        .map(|field| {
            let (cur, refv) = (current.value(field), reference.value(field));
            let diff = match (cur, refv) {
                (Some(c), Some(r)) => Some(MetricDiff::new(c, r, field.more_is_worse())),
                _ => None,
            };
            ComparisonRow {
                field,
                current: cur,
                reference: refv,
                diff,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandPercents {
    pub left: f64,
    pub right: f64,
}

/// Share of total usage per hand, in percent. Zero total gives zeros.
pub fn compute_hand_percents(usages: &[FingerUsage]) -> HandPercents {
    let (left, right) = usages
        .iter()
        .filter(|u| u.value.is_finite())
        .fold((0.0, 0.0), |(l, r), u| match u.hand {
            Hand::Left => (l + u.value, r),
            Hand::Right => (l, r + u.value),
        });

    let total = left + right;
    if total == 0.0 {
        return HandPercents::default();
    }
    HandPercents {
        left: left / total * 100.0,
        right: right / total * 100.0,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricFilter {
    pub corpus: Option<Id>,
    pub keyboard: Option<Id>,
    pub layout: Option<Id>,
    pub name_contains: Option<String>,
}

impl MetricFilter {
    pub fn matches(&self, metric: &Metric) -> bool {
        self.corpus.map_or(true, |c| metric.corpus == c)
            && self.keyboard.map_or(true, |k| metric.keyboard == k)
            && self.layout.map_or(true, |l| metric.layout == l)
            && self.name_contains.as_ref().map_or(true, |needle| {
                metric
                    .layout_name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

pub fn filter_metrics<'a>(metrics: &'a [Metric], filter: &MetricFilter) -> Vec<&'a Metric> {
    metrics.iter().filter(|m| filter.matches(m)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Stable sort by one column. Records without a value go last either way.
pub fn sort_metrics(metrics: &mut [&Metric], field: MetricField, order: SortOrder) {
    metrics.sort_by(|a, b| match (a.value(field), b.value(field)) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.total_cmp(&y),
            SortOrder::Desc => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
