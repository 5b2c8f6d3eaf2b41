// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tabular data container and its pooled aggregates.

use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;

use crate::column::{Column, ColumnDef};
use crate::diagnostic::Diagnostic;
use crate::row::Row;
use crate::value::Value;

/// Memoization key: operation name, sorted column list, and parameter bits
/// (quantile probability, zero otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    op: &'static str,
    columns: Vec<String>,
    param: u64,
}

#[derive(Debug, Clone)]
enum CacheSlot {
    Value(Option<Value>),
    Num(Option<f64>),
}

/// An immutable table of rows plus column metadata.
///
/// The table owns an insertion-ordered row list and a column list whose order
/// defines default display and stacking order. Aggregates pool values across
/// one or more columns, skip nulls, and memoize their results; transforms
/// return a **new** table with a fresh cache, so a held reference never
/// observes mutation.
///
/// Recoverable lookup failures (unknown columns, bad indices) are recorded as
/// [`Diagnostic`]s and surfaced as `None`. The memo cache and diagnostics
/// list use interior mutability, so a table is single-threaded by design.
pub struct DataTable {
    pub(crate) rows: Vec<Row>,
    pub(crate) columns: Vec<Column>,
    cache: RefCell<HashMap<CacheKey, CacheSlot>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

/// Five-number summary of a pooled value set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Smallest value.
    pub min: f64,
    /// Lower quartile (p = 0.25).
    pub lower_quartile: f64,
    /// Median (p = 0.5).
    pub median: f64,
    /// Upper quartile (p = 0.75).
    pub upper_quartile: f64,
    /// Largest value.
    pub max: f64,
}

impl DataTable {
    /// Builds a table from raw rows and column definitions.
    ///
    /// Every row value is sanitized (non-finite numbers become `Null`).
    /// Definitions without an explicit continuity flag are classified from
    /// the first non-null value in their column: numbers and times are
    /// continuous, everything else (including an all-null column) is
    /// categorical.
    pub fn new(mut rows: Vec<Row>, defs: Vec<ColumnDef>) -> Self {
        for row in &mut rows {
            row.sanitize();
        }
        let columns = defs
            .into_iter()
            .map(|def| {
                let inferred = rows
                    .iter()
                    .map(|row| row.get(&def.key))
                    .find(|v| !v.is_null())
                    .is_some_and(Value::is_continuous);
                def.resolve(inferred)
            })
            .collect();
        Self::from_parts(rows, columns)
    }

    /// Builds a table from already-resolved parts, with a fresh cache.
    pub(crate) fn from_parts(rows: Vec<Row>, columns: Vec<Column>) -> Self {
        Self {
            rows,
            columns,
            cache: RefCell::new(HashMap::new()),
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// The rows, in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The column descriptors, in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column descriptor by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validates that every key names an existing column, recording a
    /// [`Diagnostic::UnknownColumn`] for each miss. Returns true when all
    /// keys (and at least one) resolve.
    pub fn check_columns(&self, columns: &[&str]) -> bool {
        if columns.is_empty() {
            self.push_diagnostic(Diagnostic::EmptyColumnList);
            return false;
        }
        let mut ok = true;
        for key in columns {
            if self.column(key).is_none() {
                self.push_diagnostic(Diagnostic::UnknownColumn {
                    column: (*key).to_owned(),
                });
                ok = false;
            }
        }
        ok
    }

    /// Drains and returns the collected diagnostics.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow_mut().drain(..).collect()
    }

    /// Returns a copy of the collected diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub(crate) fn push_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Pools non-null values across `columns` (column order, then row order).
    /// `None` if any column is unknown.
    fn pooled(&self, columns: &[&str]) -> Option<Vec<Value>> {
        if !self.check_columns(columns) {
            return None;
        }
        let mut out = Vec::new();
        for key in columns {
            for row in &self.rows {
                let v = row.get(key);
                if !v.is_null() {
                    out.push(v.clone());
                }
            }
        }
        Some(out)
    }

    /// Pools the numeric forms of non-null values across `columns`. Values
    /// without a numeric form (text) are skipped.
    fn pooled_numeric(&self, columns: &[&str]) -> Option<Vec<f64>> {
        Some(
            self.pooled(columns)?
                .iter()
                .filter_map(Value::as_f64)
                .collect(),
        )
    }

    fn memo_value(
        &self,
        op: &'static str,
        columns: &[&str],
        compute: impl FnOnce() -> Option<Value>,
    ) -> Option<Value> {
        let key = self.cache_key(op, columns, 0);
        if let Some(CacheSlot::Value(hit)) = self.cache.borrow().get(&key) {
            return hit.clone();
        }
        let computed = compute();
        self.cache
            .borrow_mut()
            .insert(key, CacheSlot::Value(computed.clone()));
        computed
    }

    fn memo_num(
        &self,
        op: &'static str,
        columns: &[&str],
        param: u64,
        compute: impl FnOnce() -> Option<f64>,
    ) -> Option<f64> {
        let key = self.cache_key(op, columns, param);
        if let Some(CacheSlot::Num(hit)) = self.cache.borrow().get(&key) {
            return *hit;
        }
        let computed = compute();
        self.cache.borrow_mut().insert(key, CacheSlot::Num(computed));
        computed
    }

    fn cache_key(&self, op: &'static str, columns: &[&str], param: u64) -> CacheKey {
        let mut columns: Vec<String> = columns.iter().map(|c| (*c).to_owned()).collect();
        columns.sort_unstable();
        CacheKey { op, columns, param }
    }

    /// Smallest pooled value under [`Value::total_cmp`]; `None` when the pool
    /// is empty or a column is unknown.
    pub fn min(&self, columns: &[&str]) -> Option<Value> {
        self.memo_value("min", columns, || {
            self.pooled(columns)?
                .into_iter()
                .min_by(|a, b| a.total_cmp(b))
        })
    }

    /// Largest pooled value under [`Value::total_cmp`].
    pub fn max(&self, columns: &[&str]) -> Option<Value> {
        self.memo_value("max", columns, || {
            self.pooled(columns)?
                .into_iter()
                .max_by(|a, b| a.total_cmp(b))
        })
    }

    /// Arithmetic sum of the pooled numeric values; `0` for an empty pool,
    /// `None` only when a column is unknown.
    pub fn sum(&self, columns: &[&str]) -> Option<f64> {
        self.memo_num("sum", columns, 0, || {
            Some(self.pooled_numeric(columns)?.iter().sum())
        })
    }

    /// Mean of the pooled numeric values; `None` for an empty pool.
    pub fn mean(&self, columns: &[&str]) -> Option<f64> {
        self.memo_num("mean", columns, 0, || {
            let values = self.pooled_numeric(columns)?;
            if values.is_empty() {
                return None;
            }
            #[allow(clippy::cast_precision_loss, reason = "row counts fit in f64")]
            let n = values.len() as f64;
            Some(values.iter().sum::<f64>() / n)
        })
    }

    /// Median of the pooled numeric values; `None` for an empty pool.
    pub fn median(&self, columns: &[&str]) -> Option<f64> {
        self.quantile(columns, 0.5)
    }

    /// Linear-interpolation quantile of the pooled numeric values.
    ///
    /// `p = 0` is the minimum, `p = 1` the maximum, `p = 0.5` the median.
    /// A probability outside `[0, 1]` records a diagnostic and returns
    /// `None`.
    pub fn quantile(&self, columns: &[&str], p: f64) -> Option<f64> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            self.push_diagnostic(Diagnostic::InvalidQuantile { p });
            return None;
        }
        self.memo_num("quantile", columns, p.to_bits(), || {
            let mut values = self.pooled_numeric(columns)?;
            values.sort_unstable_by(f64::total_cmp);
            quantile_sorted(&values, p)
        })
    }

    /// Population variance of the pooled numeric values; `None` for an empty
    /// pool, `0` for a single value.
    pub fn variance(&self, columns: &[&str]) -> Option<f64> {
        self.memo_num("variance", columns, 0, || {
            population_variance(&self.pooled_numeric(columns)?)
        })
    }

    /// Population standard deviation: `sqrt(variance)`.
    pub fn deviation(&self, columns: &[&str]) -> Option<f64> {
        Some(self.variance(columns)?.sqrt())
    }

    /// Five-number summary of the pooled numeric values.
    pub fn summary(&self, columns: &[&str]) -> Option<Summary> {
        Some(Summary {
            min: self.quantile(columns, 0.0)?,
            lower_quartile: self.quantile(columns, 0.25)?,
            median: self.quantile(columns, 0.5)?,
            upper_quartile: self.quantile(columns, 0.75)?,
            max: self.quantile(columns, 1.0)?,
        })
    }

    /// `[min, max]` of the pooled values.
    pub fn extent(&self, columns: &[&str]) -> Option<(Value, Value)> {
        Some((self.min(columns)?, self.max(columns)?))
    }

    /// Distinct pooled values in order of first appearance (not sorted).
    pub fn unique_values(&self, columns: &[&str]) -> Option<Vec<Value>> {
        let pooled = self.pooled(columns)?;
        let mut out: Vec<Value> = Vec::new();
        for v in pooled {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        Some(out)
    }

    /// Full column values in row order, nulls preserved.
    pub fn column_data(&self, column: &str) -> Option<Vec<Value>> {
        if !self.check_columns(&[column]) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.get(column).clone()).collect())
    }

    /// Maps every row through `f`, producing a same-length table with the
    /// columns carried over verbatim.
    pub fn map_rows(&self, f: impl FnMut(&Row) -> Row) -> Self {
        let rows = self.rows.iter().map(f).collect();
        Self::from_parts(rows, self.columns.clone())
    }

    /// Bulk row replacement escape hatch.
    pub fn update_rows(&self, f: impl FnOnce(&[Row]) -> Vec<Row>) -> Self {
        Self::from_parts(f(&self.rows), self.columns.clone())
    }

    /// Bulk column replacement escape hatch. Rows are carried over verbatim.
    pub fn update_columns(&self, f: impl FnOnce(&[Column]) -> Vec<Column>) -> Self {
        Self::from_parts(self.rows.clone(), f(&self.columns))
    }
}

impl Clone for DataTable {
    /// Clones rows and columns; the clone starts with a fresh cache and an
    /// empty diagnostics list.
    fn clone(&self) -> Self {
        Self::from_parts(self.rows.clone(), self.columns.clone())
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// Linear-interpolation quantile over an ascending-sorted slice.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    #[allow(clippy::cast_precision_loss, reason = "row counts fit in f64")]
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "h is within [0, len-1] by the p range check"
    )]
    let i = lo as usize;
    let frac = h - lo;
    if frac == 0.0 {
        return Some(sorted[i]);
    }
    Some(sorted[i] + (sorted[i + 1] - sorted[i]) * frac)
}

/// Population variance; `None` for an empty slice.
pub(crate) fn population_variance(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss, reason = "row counts fit in f64")]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply_demand() -> DataTable {
        DataTable::new(
            vec![
                Row::new().with("supply", 12.0).with("demand", 99.0),
                Row::new().with("supply", 32.0).with("demand", 4.0),
            ],
            vec![ColumnDef::new("supply"), ColumnDef::new("demand")],
        )
    }

    #[test]
    fn construction_infers_continuity_from_first_non_null_value() {
        let table = DataTable::new(
            vec![
                Row::new().with("n", Value::Null).with("s", "a"),
                Row::new().with("n", 3.0).with("s", "b"),
            ],
            vec![ColumnDef::new("n"), ColumnDef::new("s")],
        );
        assert!(table.column("n").unwrap().continuous);
        assert!(!table.column("s").unwrap().continuous);
    }

    #[test]
    fn explicit_continuity_wins_over_inference() {
        let table = DataTable::new(
            vec![Row::new().with("rank", 3.0)],
            vec![ColumnDef::new("rank").with_continuous(false)],
        );
        assert!(!table.column("rank").unwrap().continuous);
    }

    #[test]
    fn pooled_aggregates_span_all_named_columns() {
        let table = supply_demand();
        assert_eq!(
            table.min(&["supply", "demand"]),
            Some(Value::Number(4.0))
        );
        assert_eq!(
            table.max(&["supply", "demand"]),
            Some(Value::Number(99.0))
        );
        assert_eq!(table.sum(&["supply"]), Some(44.0));
    }

    #[test]
    fn unknown_column_records_diagnostic_and_returns_none() {
        let table = supply_demand();
        assert_eq!(table.min(&["price"]), None);
        assert_eq!(
            table.take_diagnostics(),
            vec![Diagnostic::UnknownColumn {
                column: "price".to_owned()
            }]
        );
    }

    #[test]
    fn empty_pool_semantics() {
        let table = DataTable::new(
            vec![Row::new().with("v", Value::Null)],
            vec![ColumnDef::new("v")],
        );
        assert_eq!(table.sum(&["v"]), Some(0.0));
        assert_eq!(table.min(&["v"]), None);
        assert_eq!(table.max(&["v"]), None);
        assert_eq!(table.mean(&["v"]), None);
        assert_eq!(table.median(&["v"]), None);
        assert_eq!(table.variance(&["v"]), None);
    }

    #[test]
    fn quantile_matches_min_median_max() {
        let table = DataTable::new(
            vec![
                Row::new().with("v", 1.0),
                Row::new().with("v", 2.0),
                Row::new().with("v", 3.0),
                Row::new().with("v", 10.0),
            ],
            vec![ColumnDef::new("v")],
        );
        assert_eq!(table.quantile(&["v"], 0.0), table.min(&["v"]).unwrap().as_f64());
        assert_eq!(table.quantile(&["v"], 1.0), table.max(&["v"]).unwrap().as_f64());
        assert_eq!(table.quantile(&["v"], 0.5), table.median(&["v"]));
        assert_eq!(table.median(&["v"]), Some(2.5));
    }

    #[test]
    fn quantile_out_of_range_is_a_diagnostic() {
        let table = supply_demand();
        assert_eq!(table.quantile(&["supply"], 1.5), None);
        assert_eq!(
            table.take_diagnostics(),
            vec![Diagnostic::InvalidQuantile { p: 1.5 }]
        );
    }

    #[test]
    fn deviation_is_sqrt_of_variance() {
        let table = DataTable::new(
            vec![
                Row::new().with("v", 2.0),
                Row::new().with("v", 4.0),
                Row::new().with("v", 4.0),
                Row::new().with("v", 4.0),
                Row::new().with("v", 5.0),
                Row::new().with("v", 5.0),
                Row::new().with("v", 7.0),
                Row::new().with("v", 9.0),
            ],
            vec![ColumnDef::new("v")],
        );
        let variance = table.variance(&["v"]).unwrap();
        let deviation = table.deviation(&["v"]).unwrap();
        assert!((variance - 4.0).abs() < 1e-12, "population variance");
        assert!((deviation - variance.sqrt()).abs() < 1e-12, "dev == sqrt(var)");
    }

    #[test]
    fn ordering_invariant_min_le_median_le_max() {
        let table = supply_demand();
        let min = table.min(&["demand"]).unwrap().as_f64().unwrap();
        let median = table.median(&["demand"]).unwrap();
        let max = table.max(&["demand"]).unwrap().as_f64().unwrap();
        assert!(min <= median && median <= max, "min <= median <= max");
    }

    #[test]
    fn summary_and_extent() {
        let table = supply_demand();
        let s = table.summary(&["demand"]).unwrap();
        assert_eq!(s.min, 4.0);
        assert_eq!(s.max, 99.0);
        assert_eq!(s.median, 51.5);
        assert_eq!(
            table.extent(&["supply"]),
            Some((Value::Number(12.0), Value::Number(32.0)))
        );
    }

    #[test]
    fn unique_values_preserve_first_seen_order() {
        let table = DataTable::new(
            vec![
                Row::new().with("fruit", "pear"),
                Row::new().with("fruit", "apple"),
                Row::new().with("fruit", "pear"),
            ],
            vec![ColumnDef::new("fruit")],
        );
        assert_eq!(
            table.unique_values(&["fruit"]),
            Some(vec![Value::from("pear"), Value::from("apple")])
        );
    }

    #[test]
    fn column_data_preserves_nulls_and_row_order() {
        let table = DataTable::new(
            vec![
                Row::new().with("v", 1.0),
                Row::new().with("v", Value::Null),
                Row::new().with("v", 3.0),
            ],
            vec![ColumnDef::new("v")],
        );
        assert_eq!(
            table.column_data("v"),
            Some(vec![Value::Number(1.0), Value::Null, Value::Number(3.0)])
        );
    }

    #[test]
    fn memoized_aggregates_are_stable_across_calls() {
        let table = supply_demand();
        let first = table.sum(&["supply", "demand"]);
        let second = table.sum(&["demand", "supply"]);
        assert_eq!(first, second);
        assert_eq!(first, Some(147.0));
    }

    #[test]
    fn map_rows_returns_a_new_table_with_same_columns() {
        let table = supply_demand();
        let doubled = table.map_rows(|row| {
            let mut out = row.clone();
            if let Some(v) = row.get("supply").as_f64() {
                out.set("supply", v * 2.0);
            }
            out
        });
        assert_eq!(doubled.sum(&["supply"]), Some(88.0));
        assert_eq!(table.sum(&["supply"]), Some(44.0));
        assert_eq!(doubled.columns(), table.columns());
    }

    #[test]
    fn text_aggregates_use_lexicographic_order() {
        let table = DataTable::new(
            vec![
                Row::new().with("name", "banana"),
                Row::new().with("name", "apple"),
            ],
            vec![ColumnDef::new("name")],
        );
        assert_eq!(table.min(&["name"]), Some(Value::from("apple")));
        assert_eq!(table.max(&["name"]), Some(Value::from("banana")));
    }
}
