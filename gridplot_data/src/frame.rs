// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame grouping and fractional-frame interpolation.
//!
//! A *frame* is the group of rows sharing one value of a chosen frame column,
//! typically a time step of an animated chart. Frames are ordered by first
//! appearance of the frame value, so callers must pre-sort rows by the
//! intended frame order; the methods here do not re-derive it.

use crate::diagnostic::Diagnostic;
use crate::interpolate::{interpolate, interpolate_discrete};
use crate::row::Row;
use crate::table::DataTable;
use crate::value::Value;

impl DataTable {
    /// Partitions the rows into one table per distinct value of `column`, in
    /// first-seen order of that value.
    pub fn frames(&self, column: &str) -> Option<Vec<Self>> {
        let groups = self.frame_groups(column)?;
        Some(
            groups
                .into_iter()
                .map(|rows| Self::from_parts(rows, self.columns.to_vec()))
                .collect(),
        )
    }

    /// Returns the table containing only the rows of the `index`-th frame.
    ///
    /// An index past the last frame records a diagnostic and returns `None`.
    pub fn frame_at(&self, column: &str, index: usize) -> Option<Self> {
        let mut groups = self.frame_groups(column)?;
        if index >= groups.len() {
            self.push_diagnostic(Diagnostic::FrameIndexOutOfRange {
                #[allow(clippy::cast_precision_loss, reason = "frame counts fit in f64")]
                index: index as f64,
                frame_count: groups.len(),
            });
            return None;
        }
        Some(Self::from_parts(groups.swap_remove(index), self.columns.to_vec()))
    }

    /// Generalizes [`DataTable::frame_at`] to a fractional index by blending
    /// the two bracketing frames.
    ///
    /// Rows of the bracketing frames are paired by their `primary_column`
    /// value (first match wins; duplicates record a warning diagnostic). For
    /// every distinct primary value of the full dataset present in **both**
    /// brackets, a row is synthesized: continuous non-primary columns blend
    /// linearly, everything else (the primary column included) selects
    /// discretely. Values present in only one bracket are dropped, so an
    /// interpolated frame can be shorter than its brackets.
    pub fn frame_at_interpolated(
        &self,
        frame_column: &str,
        primary_column: &str,
        index: f64,
    ) -> Option<Self> {
        if frame_column == primary_column {
            self.push_diagnostic(Diagnostic::FrameEqualsPrimary {
                column: frame_column.to_owned(),
            });
            return None;
        }
        if !self.check_columns(&[frame_column, primary_column]) {
            return None;
        }
        let groups = self.frame_groups(frame_column)?;
        #[allow(clippy::cast_precision_loss, reason = "frame counts fit in f64")]
        let last = (groups.len().max(1) - 1) as f64;
        if groups.is_empty() || !index.is_finite() || index < 0.0 || index > last {
            self.push_diagnostic(Diagnostic::FrameIndexOutOfRange {
                index,
                frame_count: groups.len(),
            });
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "index is finite and within [0, frame_count - 1]"
        )]
        let lower = index.floor() as usize;
        let blend = index - index.floor();
        if blend == 0.0 {
            return Some(Self::from_parts(
                groups[lower].clone(),
                self.columns.to_vec(),
            ));
        }

        let lower_rows = self.rows_by_primary(&groups[lower], primary_column, lower);
        let upper_rows = self.rows_by_primary(&groups[lower + 1], primary_column, lower + 1);
        let primary_values = self.unique_values(&[primary_column])?;

        let mut rows = Vec::new();
        for primary in &primary_values {
            let Some(a) = lookup(&lower_rows, primary) else {
                continue;
            };
            let Some(b) = lookup(&upper_rows, primary) else {
                continue;
            };
            let mut row = Row::new();
            for column in &self.columns {
                let va = a.get(&column.key);
                let vb = b.get(&column.key);
                let blended = if column.key == primary_column || !column.continuous {
                    interpolate_discrete(va, vb, blend)
                } else {
                    interpolate(va, vb, blend)
                };
                // The blend is strictly inside (0, 1) here, so this cannot
                // actually fail.
                row.set(column.key.clone(), blended.unwrap_or(Value::Null));
            }
            rows.push(row);
        }
        Some(Self::from_parts(rows, self.columns.to_vec()))
    }

    /// Groups rows by distinct `column` value in first-seen order.
    fn frame_groups(&self, column: &str) -> Option<Vec<Vec<Row>>> {
        if !self.check_columns(&[column]) {
            return None;
        }
        let mut keys: Vec<Value> = Vec::new();
        let mut groups: Vec<Vec<Row>> = Vec::new();
        for row in self.rows() {
            let key = row.get(column);
            match keys.iter().position(|k| k == key) {
                Some(i) => groups[i].push(row.clone()),
                None => {
                    keys.push(key.clone());
                    groups.push(vec![row.clone()]);
                }
            }
        }
        Some(groups)
    }

    /// Pairs each distinct primary value with its first matching row,
    /// recording a warning for duplicates.
    fn rows_by_primary<'a>(
        &self,
        rows: &'a [Row],
        primary_column: &str,
        frame: usize,
    ) -> Vec<(&'a Value, &'a Row)> {
        let mut out: Vec<(&Value, &Row)> = Vec::new();
        for row in rows {
            let key = row.get(primary_column);
            if out.iter().any(|(k, _)| *k == key) {
                self.push_diagnostic(Diagnostic::DuplicatePrimaryValue {
                    column: primary_column.to_owned(),
                    frame,
                });
            } else {
                out.push((key, row));
            }
        }
        out
    }
}

fn lookup<'a>(pairs: &[(&'a Value, &'a Row)], key: &Value) -> Option<&'a Row> {
    pairs.iter().find(|(k, _)| *k == key).map(|(_, row)| *row)
}
