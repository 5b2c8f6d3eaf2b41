// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scale derivation pipeline.
//!
//! [`derive_scales`] consumes dimension configs plus a data table and
//! produces, per dimension, a [`Scale`] and the per-row scaled values the
//! renderer draws from. The pipeline holds no state of its own: scales are
//! rebuilt from scratch on every call (cheap, and immune to stale-scale bugs
//! when the table changes underneath an animation).

use core::fmt;

use gridplot_data::{DataTable, Value};
use smallvec::SmallVec;

use crate::dimension::{Dimension, DimensionRole, ScaleKind};
use crate::scale::{BandScale, LinearScale, Scale, TimeScale};

/// Errors raised while deriving scales.
///
/// These indicate caller configuration mistakes and are raised eagerly,
/// unlike the table's soft `None`-with-diagnostic policy for data-shape
/// probes: a dimension that mixes classifications or stacks text cannot be
/// recovered from mid-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// A dimension named no columns.
    NoColumns,
    /// A dimension referenced a column the table does not have.
    UnknownColumn(String),
    /// A dimension mixed continuous and categorical columns.
    MixedContinuity(Vec<String>),
    /// A stacked dimension contained a non-numeric value.
    StackNonNumeric(String),
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => write!(f, "dimension names no columns"),
            Self::UnknownColumn(column) => write!(f, "unknown column {column:?}"),
            Self::MixedContinuity(columns) => {
                write!(
                    f,
                    "cannot share continuous and non continuous data: {}",
                    columns.join(", ")
                )
            }
            Self::StackNonNumeric(column) => {
                write!(f, "cannot stack non-numeric column {column:?}")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// One derived dimension: its scale plus per-row scaled values.
///
/// `values` is parallel to the table's rows; each entry holds one scaled
/// value per dimension column, in the dimension's column order. A `None`
/// marks a null source value the renderer should skip.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDimension {
    /// The derived scale.
    pub scale: Scale,
    /// Row-indexed scaled values.
    pub values: Vec<SmallVec<[Option<f64>; 2]>>,
}

/// Derives one scale and scaled-value array per dimension, in input order.
pub fn derive_scales(
    dimensions: &[Dimension],
    table: &DataTable,
) -> Result<Vec<ScaledDimension>, ScaleError> {
    dimensions
        .iter()
        .map(|dimension| derive_dimension(dimension, table))
        .collect()
}

fn derive_dimension(
    dimension: &Dimension,
    table: &DataTable,
) -> Result<ScaledDimension, ScaleError> {
    let columns: Vec<&str> = dimension.columns().iter().map(String::as_str).collect();
    if columns.is_empty() {
        return Err(ScaleError::NoColumns);
    }
    let mut continuity: SmallVec<[bool; 4]> = SmallVec::new();
    for key in &columns {
        let Some(column) = table.column(key) else {
            // Record the table-side diagnostic too, so interactive probes
            // observe a consistent trail.
            table.check_columns(&[*key]);
            return Err(ScaleError::UnknownColumn((*key).to_owned()));
        };
        continuity.push(column.continuous);
    }
    let continuous = continuity[0];
    if continuity.iter().any(|c| *c != continuous) {
        return Err(ScaleError::MixedContinuity(
            columns.iter().map(|c| (*c).to_owned()).collect(),
        ));
    }

    let temporal = sample_is_temporal(table, &columns);
    let kind = dimension.kind().unwrap_or(if temporal {
        ScaleKind::Time
    } else if continuous {
        ScaleKind::Linear
    } else {
        ScaleKind::Band
    });

    let scale = match kind {
        ScaleKind::Linear => {
            Scale::Linear(LinearScale::new(
                continuous_domain(dimension, table, &columns)?,
                dimension.range(),
            ))
        }
        ScaleKind::Time => {
            Scale::Time(TimeScale::new(
                continuous_domain(dimension, table, &columns)?,
                dimension.range(),
            ))
        }
        ScaleKind::Band => {
            let domain = table.unique_values(&columns).unwrap_or_default();
            Scale::Band(BandScale::new(domain, dimension.range()))
        }
    };
    let scale = dimension.apply_update(scale);

    let half_bandwidth = scale.bandwidth() / 2.0;
    let screen_top = scale.range().1;
    let values = table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|key| {
                    let scaled = scale.map_value(row.get(key))?;
                    Some(match dimension.role() {
                        DimensionRole::X => scaled + half_bandwidth,
                        DimensionRole::Y => screen_top - (scaled + half_bandwidth),
                        DimensionRole::Other => scaled,
                    })
                })
                .collect()
        })
        .collect();

    Ok(ScaledDimension { scale, values })
}

/// Returns true if the first non-null sampled value across `columns` is a
/// time.
fn sample_is_temporal(table: &DataTable, columns: &[&str]) -> bool {
    for key in columns {
        for row in table.rows() {
            match row.get(key) {
                Value::Null => continue,
                Value::Time(_) => return true,
                _ => return false,
            }
        }
    }
    false
}

/// Computes the `[lo, hi]` numeric domain for a continuous dimension.
fn continuous_domain(
    dimension: &Dimension,
    table: &DataTable,
    columns: &[&str],
) -> Result<(f64, f64), ScaleError> {
    let (lo, hi) = if dimension.stack() {
        stacked_extent(table, columns)?
    } else {
        let lo = table.min(columns).and_then(|v| v.as_f64());
        let hi = table.max(columns).and_then(|v| v.as_f64());
        match (lo, hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            // All-null dimension: degenerate domain, everything maps to the
            // range start.
            _ => (0.0, 0.0),
        }
    };
    Ok((if dimension.zero() { 0.0 } else { lo }, hi))
}

/// Extent of per-row sums across `columns`. Nulls contribute zero; text is a
/// hard error, since stacking is only meaningful for additive numbers.
fn stacked_extent(table: &DataTable, columns: &[&str]) -> Result<(f64, f64), ScaleError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for row in table.rows() {
        let mut sum = 0.0;
        for key in columns {
            match row.get(key) {
                Value::Null => {}
                Value::Number(v) => sum += v,
                _ => return Err(ScaleError::StackNonNumeric((*key).to_owned())),
            }
        }
        lo = lo.min(sum);
        hi = hi.max(sum);
    }
    if lo.is_finite() && hi.is_finite() {
        Ok((lo, hi))
    } else {
        Ok((0.0, 0.0))
    }
}
