// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Histogram binning of a continuous column.
//!
//! Binning partitions the domain of one continuous column into half-open
//! intervals `[lower, upper)` (the final interval is right-closed), regroups
//! each source row into its interval, and returns a new table with one row
//! per non-empty bin. The binned column is replaced by a `<key>Lower` /
//! `<key>Upper` pair holding the interval edges; every other column carries
//! the list of its child-row values, which a row mapper can reduce (for
//! example, to a count or a sum).

use core::fmt;

use crate::column::Column;
use crate::row::Row;
use crate::table::{DataTable, population_variance, quantile_sorted};
use crate::value::{Value, time_from_millis};

/// How interior bin thresholds are chosen.
///
/// The three named rules compute a bin count from the data; counts become
/// evenly spaced edges over the domain. Explicit edges are filtered to the
/// open domain interval and sorted.
#[derive(Debug, Clone)]
pub enum ThresholdStrategy {
    /// Sturges' formula, `ceil(log2 n) + 1` bins. The default.
    Sturges,
    /// Scott's normal reference rule, width `3.49 σ n^(-1/3)`.
    Scott,
    /// Freedman–Diaconis rule, width `2 IQR n^(-1/3)`.
    FreedmanDiaconis,
    /// A fixed number of evenly spaced bins.
    Count(usize),
    /// Explicit interior threshold values.
    Edges(Vec<f64>),
    /// A custom generator: `(non-null numeric values, min, max)` to interior
    /// thresholds. The named rules are exported as free functions
    /// ([`sturges_bin_count`] and friends) for generators that build on them.
    Custom(fn(&[f64], f64, f64) -> Vec<f64>),
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::Sturges
    }
}

impl PartialEq for ThresholdStrategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sturges, Self::Sturges)
            | (Self::Scott, Self::Scott)
            | (Self::FreedmanDiaconis, Self::FreedmanDiaconis) => true,
            (Self::Count(a), Self::Count(b)) => a == b,
            (Self::Edges(a), Self::Edges(b)) => a == b,
            // Function pointer identity is unpredictable across codegen
            // units, so custom generators never compare equal.
            _ => false,
        }
    }
}

/// Configuration for [`DataTable::bin`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    /// The continuous column to bin.
    pub column: String,
    /// Threshold selection strategy.
    pub strategy: ThresholdStrategy,
    /// Domain override; defaults to `[min, max]` of the column.
    pub domain: Option<(f64, f64)>,
}

impl BinSpec {
    /// Creates a spec with the Sturges default and an inferred domain.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            strategy: ThresholdStrategy::default(),
            domain: None,
        }
    }

    /// Sets the threshold strategy.
    pub fn with_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Overrides the binning domain.
    pub fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = Some((lo, hi));
        self
    }
}

/// Errors returned by [`DataTable::bin`].
///
/// These are hard errors: binning a column that does not exist or is not
/// continuous is a caller programming mistake, not a data condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinError {
    /// The named column does not exist.
    UnknownColumn(String),
    /// The named column is categorical.
    NotContinuous(String),
    /// No domain was given and the column has no numeric values to infer
    /// one from.
    EmptyDomain,
}

impl fmt::Display for BinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn(column) => write!(f, "unknown column {column:?}"),
            Self::NotContinuous(column) => {
                write!(f, "cannot bin non-continuous column {column:?}")
            }
            Self::EmptyDomain => write!(f, "no values to infer a bin domain from"),
        }
    }
}

impl std::error::Error for BinError {}

/// Bin count by Sturges' formula.
pub fn sturges_bin_count(values: &[f64]) -> usize {
    if values.is_empty() {
        return 1;
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "log2 of a row count is tiny"
    )]
    let bins = (values.len() as f64).log2().ceil() as usize + 1;
    bins.max(1)
}

/// Bin count by Scott's normal reference rule.
pub fn scott_bin_count(values: &[f64], lo: f64, hi: f64) -> usize {
    let Some(variance) = population_variance(values) else {
        return 1;
    };
    #[allow(clippy::cast_precision_loss, reason = "row counts fit in f64")]
    let width = 3.49 * variance.sqrt() * (values.len() as f64).powf(-1.0 / 3.0);
    count_from_width(lo, hi, width)
}

/// Bin count by the Freedman–Diaconis rule.
pub fn freedman_diaconis_bin_count(values: &[f64], lo: f64, hi: f64) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let iqr = match (quantile_sorted(&sorted, 0.75), quantile_sorted(&sorted, 0.25)) {
        (Some(hi_q), Some(lo_q)) => hi_q - lo_q,
        _ => return 1,
    };
    #[allow(clippy::cast_precision_loss, reason = "row counts fit in f64")]
    let width = 2.0 * iqr * (values.len() as f64).powf(-1.0 / 3.0);
    count_from_width(lo, hi, width)
}

fn count_from_width(lo: f64, hi: f64, width: f64) -> usize {
    if !width.is_finite() || width <= 0.0 || hi <= lo {
        return 1;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "bounded below by 1 and above by the capped ratio"
    )]
    let count = ((hi - lo) / width).ceil().clamp(1.0, 10_000.0) as usize;
    count
}

/// Evenly spaced interior edges for `count` bins over `[lo, hi]`.
fn edges_from_count(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count <= 1 || hi <= lo {
        return Vec::new();
    }
    let span = hi - lo;
    #[allow(clippy::cast_precision_loss, reason = "bin counts are small")]
    let step = span / count as f64;
    let mut edges = Vec::with_capacity(count - 1);
    for i in 1..count {
        #[allow(clippy::cast_precision_loss, reason = "bin counts are small")]
        let offset = step * i as f64;
        edges.push(lo + offset);
    }
    edges
}

impl DataTable {
    /// Bins `spec.column` and regroups rows per bin. See the module docs.
    ///
    /// Equivalent to [`DataTable::bin_with`] without a row mapper or column
    /// updater: each surviving column holds the `Value::List` of its
    /// child-row values.
    pub fn bin(&self, spec: &BinSpec) -> Result<Self, BinError> {
        self.bin_with(spec, None, None)
    }

    /// Bins `spec.column`, post-processing each collected row with
    /// `row_mapper` and the final column list with `column_updater`.
    ///
    /// The mapper receives a row whose values are the per-column
    /// `Value::List`s of the bin's child rows and returns the new row shape;
    /// the `<key>Lower` / `<key>Upper` edge fields are appended after it
    /// runs. The binned column's edges are times when the column held times,
    /// numbers otherwise.
    pub fn bin_with(
        &self,
        spec: &BinSpec,
        row_mapper: Option<&dyn Fn(Row) -> Row>,
        column_updater: Option<&dyn Fn(Vec<Column>) -> Vec<Column>>,
    ) -> Result<Self, BinError> {
        let key = spec.column.as_str();
        let column = self
            .column(key)
            .ok_or_else(|| BinError::UnknownColumn(key.to_owned()))?;
        if !column.continuous {
            return Err(BinError::NotContinuous(key.to_owned()));
        }
        let label = column.label.clone();
        let date_typed = self
            .rows()
            .iter()
            .map(|row| row.get(key))
            .find(|v| !v.is_null())
            .is_some_and(|v| matches!(v, Value::Time(_)));

        let values: Vec<f64> = self
            .rows()
            .iter()
            .filter_map(|row| row.get(key).as_f64())
            .collect();
        let (lo, hi) = match spec.domain {
            Some(domain) => domain,
            None => {
                let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(BinError::EmptyDomain);
                }
                (lo, hi)
            }
        };

        let mut interior = match &spec.strategy {
            ThresholdStrategy::Sturges => edges_from_count(lo, hi, sturges_bin_count(&values)),
            ThresholdStrategy::Scott => edges_from_count(lo, hi, scott_bin_count(&values, lo, hi)),
            ThresholdStrategy::FreedmanDiaconis => {
                edges_from_count(lo, hi, freedman_diaconis_bin_count(&values, lo, hi))
            }
            ThresholdStrategy::Count(count) => edges_from_count(lo, hi, *count),
            ThresholdStrategy::Edges(edges) => edges.clone(),
            ThresholdStrategy::Custom(generator) => generator(&values, lo, hi),
        };
        interior.retain(|e| e.is_finite() && *e > lo && *e < hi);
        interior.sort_unstable_by(f64::total_cmp);
        interior.dedup();

        let mut boundaries = Vec::with_capacity(interior.len() + 2);
        boundaries.push(lo);
        boundaries.extend(interior);
        boundaries.push(hi);
        let bin_count = boundaries.len() - 1;

        // Direct threshold lookup; rows outside the domain are dropped.
        let mut members: Vec<Vec<&Row>> = vec![Vec::new(); bin_count];
        for row in self.rows() {
            let Some(v) = row.get(key).as_f64() else {
                continue;
            };
            if v < lo || v > hi {
                continue;
            }
            let idx = if v >= hi {
                bin_count - 1
            } else {
                boundaries.partition_point(|b| *b <= v).max(1) - 1
            };
            members[idx].push(row);
        }

        let lower_key = format!("{key}Lower");
        let upper_key = format!("{key}Upper");
        let edge_value = |edge: f64| {
            if date_typed {
                time_from_millis(edge).map_or(Value::Null, Value::Time)
            } else {
                Value::Number(edge)
            }
        };

        let mut rows = Vec::new();
        for (idx, bin_rows) in members.iter().enumerate() {
            if bin_rows.is_empty() {
                continue;
            }
            let mut row = Row::new();
            for column in self.columns() {
                let collected: Vec<Value> = bin_rows
                    .iter()
                    .map(|r| r.get(&column.key).clone())
                    .collect();
                row.set(column.key.clone(), Value::List(collected));
            }
            if let Some(mapper) = row_mapper {
                row = mapper(row);
            }
            row.set(lower_key.clone(), edge_value(boundaries[idx]));
            row.set(upper_key.clone(), edge_value(boundaries[idx + 1]));
            rows.push(row);
        }

        let mut columns = self.columns().to_vec();
        if let Some(pos) = columns.iter().position(|c| c.key == key) {
            columns[pos] = Column {
                key: lower_key,
                label: label.clone(),
                continuous: true,
            };
            columns.insert(
                pos + 1,
                Column {
                    key: upper_key,
                    label,
                    continuous: true,
                },
            );
        }
        if let Some(updater) = column_updater {
            columns = updater(columns);
        }
        Ok(Self::from_parts(rows, columns))
    }
}
