// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row storage.

use hashbrown::HashMap;

use crate::value::Value;

const NULL: Value = Value::Null;

/// A single table row: a mapping from column key to [`Value`].
///
/// Every value passes through [`Value::sanitized`] on insertion, so a row
/// never holds non-finite numbers. Rows are treated as immutable once handed
/// to a table; transforms build new rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into().sanitized());
    }

    /// Returns the value for `key`, or `Null` if the row has no such key.
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    /// Returns the number of keyed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Re-sanitizes every value in place. Used at table construction for
    /// rows built outside [`Row::set`].
    pub(crate) fn sanitize(&mut self) {
        for value in self.values.values_mut() {
            let taken = core::mem::take(value);
            *value = taken.sanitized();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_read_as_null() {
        let row = Row::new().with("supply", 12.0);
        assert_eq!(row.get("supply"), &Value::Number(12.0));
        assert_eq!(row.get("demand"), &Value::Null);
    }

    #[test]
    fn insertion_sanitizes() {
        let row = Row::new().with("v", f64::NAN);
        assert_eq!(row.get("v"), &Value::Null);
    }
}
