// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dimension configuration.

use core::fmt;

use crate::scale::Scale;

/// Explicit scale family override for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    /// Force a linear scale.
    Linear,
    /// Force a time scale.
    Time,
    /// Force a band scale.
    Band,
}

/// The visual role of a dimension, which controls screen-space adjustment of
/// scaled values.
///
/// `X` shifts each scaled value by half a bandwidth so marks center on their
/// band; `Y` additionally flips into screen space (`range.1 - value`), since
/// pixel y grows downward. Every other dimension (radius, color ramp
/// position, ...) takes the raw scale output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionRole {
    /// Horizontal position.
    X,
    /// Vertical position, flipped into screen space.
    Y,
    /// Any non-positional dimension.
    #[default]
    Other,
}

/// Configuration binding one or more data columns to a visual dimension.
///
/// All named columns must share one continuity classification; the pipeline
/// rejects mixed dimensions at construction time.
pub struct Dimension {
    columns: Vec<String>,
    range: (f64, f64),
    kind: Option<ScaleKind>,
    role: DimensionRole,
    zero: bool,
    stack: bool,
    update: Option<Box<dyn Fn(Scale) -> Scale>>,
}

impl Dimension {
    /// Creates a dimension over `columns` with the given pixel-space range.
    pub fn new<I, S>(columns: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            range,
            kind: None,
            role: DimensionRole::Other,
            zero: false,
            stack: false,
            update: None,
        }
    }

    /// Overrides the inferred scale family.
    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the visual role (default [`DimensionRole::Other`]).
    pub fn with_role(mut self, role: DimensionRole) -> Self {
        self.role = role;
        self
    }

    /// Zero-bases the continuous domain (`[0, max]` instead of `[min, max]`).
    pub fn with_zero(mut self, zero: bool) -> Self {
        self.zero = zero;
        self
    }

    /// Sizes the domain for stacked rendering: the domain covers per-row
    /// sums across the dimension's columns rather than individual values.
    pub fn with_stack(mut self, stack: bool) -> Self {
        self.stack = stack;
        self
    }

    /// Installs a final transform applied to the constructed scale, e.g.
    /// padding the domain or adjusting band padding.
    pub fn with_update(mut self, update: impl Fn(Scale) -> Scale + 'static) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    /// The bound column keys.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The pixel-space output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// The explicit scale family, if any.
    pub fn kind(&self) -> Option<ScaleKind> {
        self.kind
    }

    /// The visual role.
    pub fn role(&self) -> DimensionRole {
        self.role
    }

    /// Whether the domain is zero-based.
    pub fn zero(&self) -> bool {
        self.zero
    }

    /// Whether the domain covers stacked sums.
    pub fn stack(&self) -> bool {
        self.stack
    }

    pub(crate) fn apply_update(&self, scale: Scale) -> Scale {
        match &self.update {
            Some(update) => update(scale),
            None => scale,
        }
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("columns", &self.columns)
            .field("range", &self.range)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .field("zero", &self.zero)
            .field("stack", &self.stack)
            .field("update", &self.update.as_ref().map(|_| "fn"))
            .finish()
    }
}
