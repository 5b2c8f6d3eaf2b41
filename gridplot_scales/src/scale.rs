// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale types mapping data values into pixel space.
//!
//! Scales come in three families, one per column classification:
//! continuous ([`LinearScale`]), temporal ([`TimeScale`]) and categorical
//! ([`BandScale`]). The [`Scale`] union exposes the operations shared by all
//! families; family-specific operations (`invert`, `bandwidth`) live on the
//! concrete types, so a caller can only ask for what the family supports.

use chrono::NaiveDateTime;
use gridplot_data::{Value, time_from_millis};

/// A scale instance of any family.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    /// Continuous linear scale.
    Linear(LinearScale),
    /// Continuous time scale over epoch milliseconds.
    Time(TimeScale),
    /// Categorical band scale.
    Band(BandScale),
}

impl Scale {
    /// Maps a data value into range space.
    ///
    /// `Null` values (and values a family cannot map, such as text through a
    /// linear scale) yield `None`, never `0` or `NaN`, so renderers can skip
    /// the mark.
    pub fn map_value(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.map(value.as_f64()?)),
            Self::Time(s) => Some(s.map(value.as_f64()?)),
            Self::Band(s) => s.position(value),
        }
    }

    /// Returns the band width for categorical scales, `0.0` otherwise.
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.bandwidth(),
            _ => 0.0,
        }
    }

    /// The configured output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
            Self::Band(s) => s.range(),
        }
    }
}

impl From<LinearScale> for Scale {
    fn from(value: LinearScale) -> Self {
        Self::Linear(value)
    }
}

impl From<TimeScale> for Scale {
    fn from(value: TimeScale) -> Self {
        Self::Time(value)
    }
}

impl From<BandScale> for Scale {
    fn from(value: BandScale) -> Self {
        Self::Band(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The configured output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns a copy with a replaced domain. Useful from a dimension's
    /// update hook (zero-basing, padding the extent, nice-ing).
    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.domain = domain;
        self
    }
}

/// A linear scale over epoch milliseconds, with time-typed accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    /// Creates a new time scale; the domain is in epoch milliseconds.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new(domain, range),
        }
    }

    /// Maps an epoch-millisecond value into range space.
    pub fn map(&self, millis: f64) -> f64 {
        self.inner.map(millis)
    }

    /// Maps a timestamp into range space.
    pub fn map_time(&self, t: NaiveDateTime) -> f64 {
        self.inner.map(Value::Time(t).as_f64().unwrap_or(0.0))
    }

    /// Maps a range value back to epoch milliseconds.
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// Maps a range value back to a timestamp, if representable.
    pub fn invert_time(&self, y: f64) -> Option<NaiveDateTime> {
        time_from_millis(self.inner.invert(y))
    }

    /// The configured domain in epoch milliseconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// The configured output range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }
}

/// A categorical band scale keyed by domain value.
///
/// Each distinct domain value owns one band of the range; `position` returns
/// the band's leading edge and `bandwidth` its width, after inner/outer
/// padding (in band units, 0.1 by default).
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<Value>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    /// Creates a band scale over the given domain values.
    pub fn new(domain: Vec<Value>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn bandwidth(&self) -> f64 {
        let (r0, r1) = self.range;
        #[allow(clippy::cast_precision_loss, reason = "domain sizes are small")]
        let n = self.domain.len() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the leading edge of the band owning `value`, or `None` if the
    /// value is not in the domain.
    pub fn position(&self, value: &Value) -> Option<f64> {
        let index = self.domain.iter().position(|v| v == value)?;
        let (r0, r1) = self.range;
        let bw = self.bandwidth();
        let step = bw * (1.0 + self.padding_inner);
        let start = if r1 >= r0 { r0 } else { r1 };
        #[allow(clippy::cast_precision_loss, reason = "domain sizes are small")]
        let offset = step * index as f64;
        Some(start + bw * self.padding_outer + offset)
    }

    /// The domain values, in band order.
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    /// The configured output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}
