// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale derivation pipeline for `gridplot_data`.
//!
//! This crate is the layer between the data container and a renderer:
//! - **Dimensions** ([`Dimension`]) bind one or more data columns to a
//!   visual axis with a pixel-space range and options (explicit family,
//!   zero-basing, stacking, a final update hook).
//! - **Scales** ([`Scale`]) come in three families — linear, time, band —
//!   inferred from column classification or overridden per dimension.
//! - [`derive_scales`] validates each dimension against the table, builds
//!   its scale, and maps every row into per-dimension scaled values.
//!
//! The pipeline is stateless: identical inputs produce identical outputs,
//! and nothing is cached beyond the table's own aggregate memoization.
//! Rendering (axes, marks, hit-testing) is out of scope.

mod derive;
mod dimension;
mod scale;

#[cfg(test)]
mod pipeline_tests;

pub use derive::{ScaleError, ScaledDimension, derive_scales};
pub use dimension::{Dimension, DimensionRole, ScaleKind};
pub use scale::{BandScale, LinearScale, Scale, TimeScale};
