// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured diagnostics for recoverable lookup failures.
//!
//! Query-style table methods never panic or return hard errors for data-shape
//! problems (an unknown column, a bad frame index): they record a diagnostic
//! on the table and return `None`, so an interactive renderer can probe
//! freely and no-op on missing data. Tests assert on the collected list via
//! [`crate::DataTable::diagnostics`] instead of capturing process output.

use core::fmt;

/// A recoverable failure recorded by a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An aggregate or transform referenced a column the table does not have.
    UnknownColumn {
        /// The missing column key.
        column: String,
    },
    /// An empty column list was passed to a pooled aggregate.
    EmptyColumnList,
    /// A quantile was requested outside `[0, 1]`.
    InvalidQuantile {
        /// The offending probability.
        p: f64,
    },
    /// A frame index was negative, non-finite, or past the last frame.
    FrameIndexOutOfRange {
        /// The requested index.
        index: f64,
        /// The number of frames available.
        frame_count: usize,
    },
    /// The frame column and primary column of an interpolation were the same.
    FrameEqualsPrimary {
        /// The shared column key.
        column: String,
    },
    /// A bracket frame held more than one row for a primary value; the first
    /// match was used. Warning-class: the operation still succeeds.
    DuplicatePrimaryValue {
        /// The primary column key.
        column: String,
        /// Index of the frame containing the duplicate.
        frame: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn { column } => write!(f, "unknown column {column:?}"),
            Self::EmptyColumnList => write!(f, "no columns given"),
            Self::InvalidQuantile { p } => {
                write!(f, "quantile probability {p} is outside the [0, 1] range")
            }
            Self::FrameIndexOutOfRange { index, frame_count } => {
                write!(f, "frame index {index} out of range for {frame_count} frames")
            }
            Self::FrameEqualsPrimary { column } => {
                write!(f, "frame column and primary column are both {column:?}")
            }
            Self::DuplicatePrimaryValue { column, frame } => {
                write!(
                    f,
                    "duplicate value for primary column {column:?} in frame {frame}; using the first match"
                )
            }
        }
    }
}
