// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value interpolation primitives used by frame animation.

use core::fmt;

use crate::value::{Value, time_from_millis};

/// Error returned when an interpolation blend factor is unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendError {
    /// The blend factor was outside `[0, 1]` or non-finite.
    OutOfRange(f64),
}

impl fmt::Display for BlendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(blend) => {
                write!(f, "blend factor {blend} is outside the [0, 1] range")
            }
        }
    }
}

impl std::error::Error for BlendError {}

fn check_blend(blend: f64) -> Result<(), BlendError> {
    if blend.is_finite() && (0.0..=1.0).contains(&blend) {
        Ok(())
    } else {
        Err(BlendError::OutOfRange(blend))
    }
}

/// Linearly interpolates between two values.
///
/// `blend == 0` returns `a` exactly and `blend == 1` returns `b` exactly,
/// before any other rule applies. At interior blends, either side being
/// `Null` makes the result `Null`, and either side being non-continuous
/// hands the pair to [`interpolate_discrete`]. Two times are blended over
/// epoch milliseconds and reconstructed as a time.
pub fn interpolate(a: &Value, b: &Value, blend: f64) -> Result<Value, BlendError> {
    check_blend(blend)?;
    // Endpoint blends return their side exactly, even against a null.
    if blend == 0.0 {
        return Ok(a.clone());
    }
    if blend == 1.0 {
        return Ok(b.clone());
    }
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }
    if !a.is_continuous() || !b.is_continuous() {
        return interpolate_discrete(a, b, blend);
    }
    // Both sides are continuous here, so the numeric forms exist.
    let (Some(va), Some(vb)) = (a.as_f64(), b.as_f64()) else {
        return Ok(Value::Null);
    };
    let blended = va + (vb - va) * blend;
    Ok(match (a, b) {
        (Value::Time(_), Value::Time(_)) => {
            time_from_millis(blended).map_or(Value::Null, Value::Time)
        }
        _ => Value::Number(blended),
    })
}

/// Discretely selects one of two values: `a` below the midpoint, `b` at or
/// above it.
pub fn interpolate_discrete(a: &Value, b: &Value, blend: f64) -> Result<Value, BlendError> {
    check_blend(blend)?;
    Ok(if blend < 0.5 { a.clone() } else { b.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_blends_numbers_linearly() {
        let v = interpolate(&Value::Number(10.0), &Value::Number(20.0), 0.1).unwrap();
        assert_eq!(v, Value::Number(11.0));
    }

    #[test]
    fn interpolate_rejects_out_of_range_blend() {
        let err = interpolate(&Value::Number(10.0), &Value::Number(20.0), 2.0);
        assert_eq!(err, Err(BlendError::OutOfRange(2.0)));
        let err = interpolate_discrete(&Value::from("a"), &Value::from("b"), -0.5);
        assert_eq!(err, Err(BlendError::OutOfRange(-0.5)));
    }

    #[test]
    fn interpolate_endpoints_are_exact() {
        let a = Value::Number(0.1);
        let b = Value::Number(0.3);
        assert_eq!(interpolate(&a, &b, 0.0).unwrap(), a);
        assert_eq!(interpolate(&a, &b, 1.0).unwrap(), b);
    }

    #[test]
    fn interpolate_null_wins_at_interior_blends() {
        assert_eq!(
            interpolate(&Value::Null, &Value::Number(5.0), 0.5).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn endpoint_blends_return_their_side_even_against_null() {
        assert_eq!(
            interpolate(&Value::Number(5.0), &Value::Null, 0.0).unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(
            interpolate(&Value::Null, &Value::Number(5.0), 1.0).unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(
            interpolate(&Value::Number(5.0), &Value::Null, 1.0).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn interpolate_delegates_to_discrete_for_text() {
        let a = Value::from("a");
        let b = Value::from("b");
        assert_eq!(interpolate(&a, &b, 0.4).unwrap(), a);
        assert_eq!(interpolate(&a, &b, 0.5).unwrap(), b);
        assert_eq!(interpolate_discrete(&a, &b, 0.6).unwrap(), b);
    }

    #[test]
    fn interpolate_times_reconstructs_a_time() {
        let a = Value::Time(time_from_millis(0.0).unwrap());
        let b = Value::Time(time_from_millis(10_000.0).unwrap());
        let mid = interpolate(&a, &b, 0.5).unwrap();
        assert_eq!(mid, Value::Time(time_from_millis(5000.0).unwrap()));
    }
}
