// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed tabular data container for charting.
//!
//! This crate provides:
//! - [`DataTable`]: an immutable table of [`Row`]s plus [`Column`] metadata,
//!   with pooled aggregates (min/max/sum/mean/median/quantile/variance),
//!   null filtering, and per-instance memoization,
//! - frame grouping and fractional-frame interpolation for animation
//!   ([`DataTable::frames`], [`DataTable::frame_at_interpolated`]),
//! - histogram binning with configurable threshold strategies
//!   ([`DataTable::bin`]),
//! - the [`interpolate`]/[`interpolate_discrete`] value primitives.
//!
//! It knows nothing about scales or rendering; `gridplot_scales` layers the
//! scale derivation pipeline on top.
//!
//! Tables are immutable: every transform returns a new table with a fresh
//! memo cache, so read-only sharing never observes mutation. Recoverable
//! lookup failures return `None` and record a [`Diagnostic`] instead of
//! panicking or logging.

mod bin;
mod column;
mod diagnostic;
mod frame;
mod interpolate;
mod row;
mod table;
mod value;

pub use bin::{
    BinError, BinSpec, ThresholdStrategy, freedman_diaconis_bin_count, scott_bin_count,
    sturges_bin_count,
};
pub use column::{Column, ColumnDef};
pub use diagnostic::Diagnostic;
pub use interpolate::{BlendError, interpolate, interpolate_discrete};
pub use row::Row;
pub use table::{DataTable, Summary};
pub use value::{Value, time_from_millis};
