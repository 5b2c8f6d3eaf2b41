// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column descriptors and definitions.

/// An immutable column descriptor attached to a table.
///
/// Columns are never mutated in place; transforms that change the column set
/// produce a new table with a new column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Unique column key, matching row keys.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Whether values in this column have intrinsic order.
    pub continuous: bool,
}

/// A column definition supplied at table construction.
///
/// Missing fields are resolved by the table: the label defaults to the key,
/// and continuity is inferred from the first non-null value in the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Unique column key.
    pub key: String,
    /// Display label; defaults to the key.
    pub label: Option<String>,
    /// Continuity override; inferred from the data when absent.
    pub continuous: Option<bool>,
}

impl ColumnDef {
    /// Creates a definition with label and continuity left for inference.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            continuous: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Forces the continuity classification instead of inferring it.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = Some(continuous);
        self
    }

    /// Resolves this definition into a column, using `inferred` where the
    /// definition left continuity unspecified.
    pub(crate) fn resolve(self, inferred: bool) -> Column {
        let label = self.label.unwrap_or_else(|| self.key.clone());
        Column {
            key: self.key,
            label,
            continuous: self.continuous.unwrap_or(inferred),
        }
    }
}
